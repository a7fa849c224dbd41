use chrono::NaiveDate;

use super::{
    Book, IssueBookError, Member, Money, ReturnBookError, Transaction, TransactionId,
};

/// 延滞債務の上限（500通貨単位）
///
/// 債務がこの額を「超える」会員には貸出しない。ちょうど500は貸出可能。
pub const DEBT_LIMIT: Money = Money::from_major(500);

/// 1日あたりの貸出料金（10通貨単位）
pub const DAILY_RENTAL_FEE: Money = Money::from_major(10);

/// 返却後の会員債務の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebtStatus {
    /// 上限以内
    WithinLimit,
    /// 上限超過（返却自体は成功している）
    OverLimit,
}

impl DebtStatus {
    pub fn of(debt: Money) -> Self {
        if debt > DEBT_LIMIT {
            DebtStatus::OverLimit
        } else {
            DebtStatus::WithinLimit
        }
    }

    pub fn is_over_limit(&self) -> bool {
        matches!(self, DebtStatus::OverLimit)
    }
}

/// 純粋関数：貸出日数を計算する
///
/// 返却日が貸出日より前の場合は0日とする。
pub fn rental_days(issue_date: NaiveDate, return_date: NaiveDate) -> i64 {
    (return_date - issue_date).num_days().max(0)
}

/// 純粋関数：貸出料金を計算する
pub fn rental_fee(issue_date: NaiveDate, return_date: NaiveDate) -> Money {
    DAILY_RENTAL_FEE * rental_days(issue_date, return_date)
}

/// 純粋関数：書籍を貸し出す
///
/// ビジネスルール（この順で検証）：
/// - 会員の債務が上限を超えていないこと
/// - 書籍の在庫があること
///
/// 副作用なし。在庫を1減らした書籍と、新しい貸出中の取引を返す。
/// 両者は呼び出し側で同一コミットにより永続化すること。
pub fn issue_book(
    member: &Member,
    book: &Book,
    issued_on: NaiveDate,
) -> Result<(Book, Transaction), IssueBookError> {
    if member.outstanding_debt > DEBT_LIMIT {
        return Err(IssueBookError::DebtLimitExceeded);
    }

    let stock = book
        .stock
        .decrement()
        .map_err(|_| IssueBookError::OutOfStock)?;

    let updated_book = Book {
        stock,
        ..book.clone()
    };

    let transaction = Transaction {
        transaction_id: TransactionId::new(),
        member_id: member.member_id,
        book_id: book.book_id,
        issue_date: issued_on,
        return_date: None,
        fee: Money::ZERO,
    };

    Ok((updated_book, transaction))
}

/// 返却処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Returned {
    pub transaction: Transaction,
    pub member: Member,
    pub fee: Money,
    pub debt_status: DebtStatus,
}

/// 純粋関数：書籍を返却する
///
/// ビジネスルール：
/// - 返却済みの取引は再返却できない
/// - 料金 = 貸出日数 × 1日あたり料金
/// - 料金は会員の債務に加算される（桁あふれする場合はエラー）
/// - 在庫は戻さない
///
/// 副作用なし。更新後の取引と会員を返す。
pub fn return_book(
    transaction: &Transaction,
    member: &Member,
    returned_on: NaiveDate,
) -> Result<Returned, ReturnBookError> {
    if !transaction.is_open() {
        return Err(ReturnBookError::AlreadyReturned);
    }

    let fee = rental_fee(transaction.issue_date, returned_on);
    let outstanding_debt = member
        .outstanding_debt
        .checked_add(fee)
        .ok_or(ReturnBookError::DebtOverflow)?;

    let returned_transaction = Transaction {
        return_date: Some(returned_on),
        fee,
        ..transaction.clone()
    };

    let updated_member = Member {
        outstanding_debt,
        ..member.clone()
    };

    let debt_status = DebtStatus::of(updated_member.outstanding_debt);

    Ok(Returned {
        transaction: returned_transaction,
        member: updated_member,
        fee,
        debt_status,
    })
}
