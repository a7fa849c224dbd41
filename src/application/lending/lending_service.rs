use crate::domain::{
    self, Book, BookId, Member, MemberId, Money, Transaction, TransactionId,
    commands::{IssueBook, ReturnBook},
    lending::DebtStatus,
};

use crate::application::ServiceDependencies;
use super::errors::{LendingApplicationError, Result};

/// 返却の結果
///
/// debt_status が OverLimit の場合、返却は成功しているが
/// 会員の債務が上限を超えたことを呼び出し側に警告する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnReceipt {
    pub transaction: Transaction,
    pub fee: Money,
    pub outstanding_debt: Money,
    pub debt_status: DebtStatus,
}

async fn load_member(deps: &ServiceDependencies, member_id: MemberId) -> Result<Member> {
    deps.member_repository
        .get_by_id(member_id)
        .await
        .map_err(LendingApplicationError::MemberRepositoryError)?
        .ok_or(LendingApplicationError::MemberNotFound)
}

async fn load_book(deps: &ServiceDependencies, book_id: BookId) -> Result<Book> {
    deps.book_repository
        .get_by_id(book_id)
        .await
        .map_err(LendingApplicationError::BookRepositoryError)?
        .ok_or(LendingApplicationError::BookNotFound)
}

async fn load_transaction(
    deps: &ServiceDependencies,
    transaction_id: TransactionId,
) -> Result<Transaction> {
    deps.transaction_repository
        .get_by_id(transaction_id)
        .await
        .map_err(LendingApplicationError::TransactionRepositoryError)?
        .ok_or(LendingApplicationError::TransactionNotFound)
}

/// 書籍を貸し出す
///
/// ビジネスルール（この順で検証）：
/// - 会員が存在すること
/// - 書籍が存在すること
/// - 会員の債務が上限（500）を超えていないこと
/// - 書籍の在庫があること
///
/// 在庫の減算と取引の作成は同一コミットで永続化される。
/// いずれかの検証に失敗した場合は何も変更しない。
///
/// # 戻り値
/// 成功時は作成された貸出中の取引
pub async fn issue_book(deps: &ServiceDependencies, cmd: IssueBook) -> Result<Transaction> {
    // 1. 会員・書籍の存在確認
    let member = load_member(deps, cmd.member_id).await?;
    let book = load_book(deps, cmd.book_id).await?;

    // 2. ドメイン層の純粋関数を呼び出し（債務上限・在庫の検証）
    let (updated_book, transaction) =
        domain::lending::issue_book(&member, &book, cmd.issued_on).map_err(|e| {
            tracing::info!(
                member_id = %member.member_id.value(),
                book_id = %book.book_id.value(),
                "Issue refused: {:?}",
                e
            );
            LendingApplicationError::from(e)
        })?;

    // 3. 在庫と取引を1回のコミットで保存
    deps.transaction_repository
        .commit_issue(&updated_book, &transaction)
        .await
        .map_err(LendingApplicationError::TransactionRepositoryError)?;

    tracing::info!(
        transaction_id = %transaction.transaction_id.value(),
        remaining_stock = updated_book.stock.value(),
        "Book issued"
    );

    Ok(transaction)
}

/// 書籍を返却する
///
/// ビジネスルール：
/// - 取引が存在すること
/// - 返却済みでないこと（再返却は何も変更しない）
/// - 料金 = 貸出日数 × 10、会員の債務に加算
/// - 在庫は戻さない
///
/// 返却後に債務が上限を超えた場合も返却は成功し、
/// ReturnReceipt の debt_status で警告する。
pub async fn return_book(deps: &ServiceDependencies, cmd: ReturnBook) -> Result<ReturnReceipt> {
    // 1. 取引と会員を取得
    let transaction = load_transaction(deps, cmd.transaction_id).await?;
    if !transaction.is_open() {
        return Err(LendingApplicationError::AlreadyReturned);
    }
    let member = load_member(deps, transaction.member_id).await?;

    // 2. ドメイン層の純粋関数で料金と債務を計算
    let returned = domain::lending::return_book(&transaction, &member, cmd.returned_on)?;

    // 3. 取引と会員を1回のコミットで保存
    //    読み込み後に別の返却が確定していた場合は返却済みとして扱う
    let committed = deps
        .transaction_repository
        .commit_return(&returned.transaction, &returned.member)
        .await
        .map_err(LendingApplicationError::TransactionRepositoryError)?;
    if !committed {
        return Err(LendingApplicationError::AlreadyReturned);
    }

    if returned.debt_status.is_over_limit() {
        tracing::warn!(
            member_id = %returned.member.member_id.value(),
            outstanding_debt = %returned.member.outstanding_debt,
            "Member has exceeded the debt limit"
        );
    } else {
        tracing::info!(
            transaction_id = %returned.transaction.transaction_id.value(),
            fee = %returned.fee,
            "Book returned"
        );
    }

    Ok(ReturnReceipt {
        transaction: returned.transaction,
        fee: returned.fee,
        outstanding_debt: returned.member.outstanding_debt,
        debt_status: returned.debt_status,
    })
}
