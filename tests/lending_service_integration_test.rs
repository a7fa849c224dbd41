use async_trait::async_trait;
use chrono::NaiveDate;
use library_lending::adapters::mock::InMemoryCatalogStore;
use library_lending::api::types::UpdateMemberRequest;
use library_lending::application::ServiceDependencies;
use library_lending::application::lending::{LendingApplicationError, issue_book, return_book};
use library_lending::domain::commands::{IssueBook, ReturnBook};
use library_lending::domain::lending::DebtStatus;
use library_lending::domain::{
    Book, BookId, Member, MemberId, Money, Transaction, TransactionId, TransactionView,
};
use library_lending::ports::TransactionRepository;
use std::sync::Arc;

mod common;

use common::{in_memory_context, seed_book, seed_member};

fn day(n: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap() + chrono::Duration::days(n)
}

fn issue_cmd(member_id: MemberId, book_id: BookId, issued_on: NaiveDate) -> IssueBook {
    IssueBook {
        member_id,
        book_id,
        issued_on,
    }
}

// ============================================================================
// 貸出
// ============================================================================

#[tokio::test]
async fn test_issue_book_success_decrements_stock_and_opens_transaction() {
    let ctx = in_memory_context();
    let member = seed_member(&ctx.store, 0);
    let book = seed_book(&ctx.store, 3);

    let transaction = issue_book(&ctx.deps, issue_cmd(member.member_id, book.book_id, day(0)))
        .await
        .expect("issue should succeed");

    assert_eq!(ctx.store.book(book.book_id).unwrap().stock.value(), 2);

    let transactions = ctx.store.all_transactions();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0], transaction);
    assert_eq!(transaction.member_id, member.member_id);
    assert_eq!(transaction.book_id, book.book_id);
    assert_eq!(transaction.issue_date, day(0));
    assert_eq!(transaction.return_date, None);
    assert_eq!(transaction.fee, Money::ZERO);
}

#[tokio::test]
async fn test_issue_book_out_of_stock_changes_nothing() {
    let ctx = in_memory_context();
    let member = seed_member(&ctx.store, 0);
    let book = seed_book(&ctx.store, 0);

    let result = issue_book(&ctx.deps, issue_cmd(member.member_id, book.book_id, day(0))).await;

    assert!(matches!(result, Err(LendingApplicationError::OutOfStock)));
    assert_eq!(ctx.store.book(book.book_id).unwrap().stock.value(), 0);
    assert!(ctx.store.all_transactions().is_empty());
}

#[tokio::test]
async fn test_issue_book_debt_over_limit_is_refused_regardless_of_stock() {
    let ctx = in_memory_context();
    let member = seed_member(&ctx.store, 501);

    for stock in [0, 1, 10] {
        let book = seed_book(&ctx.store, stock);

        let result =
            issue_book(&ctx.deps, issue_cmd(member.member_id, book.book_id, day(0))).await;

        assert!(matches!(result, Err(LendingApplicationError::DebtLimitExceeded)));
        assert_eq!(ctx.store.book(book.book_id).unwrap().stock.value(), stock);
    }
    assert!(ctx.store.all_transactions().is_empty());
}

#[tokio::test]
async fn test_issue_book_debt_exactly_at_limit_is_allowed() {
    let ctx = in_memory_context();
    let member = seed_member(&ctx.store, 500);
    let book = seed_book(&ctx.store, 1);

    let result = issue_book(&ctx.deps, issue_cmd(member.member_id, book.book_id, day(0))).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_issue_book_unknown_member() {
    let ctx = in_memory_context();
    let book = seed_book(&ctx.store, 1);

    let result = issue_book(&ctx.deps, issue_cmd(MemberId::new(), book.book_id, day(0))).await;

    assert!(matches!(result, Err(LendingApplicationError::MemberNotFound)));
}

#[tokio::test]
async fn test_issue_book_unknown_book() {
    let ctx = in_memory_context();
    let member = seed_member(&ctx.store, 0);

    let result = issue_book(&ctx.deps, issue_cmd(member.member_id, BookId::new(), day(0))).await;

    assert!(matches!(result, Err(LendingApplicationError::BookNotFound)));
}

#[tokio::test]
async fn test_issue_book_member_checked_before_book() {
    let ctx = in_memory_context();

    let result = issue_book(&ctx.deps, issue_cmd(MemberId::new(), BookId::new(), day(0))).await;

    assert!(matches!(result, Err(LendingApplicationError::MemberNotFound)));
}

#[tokio::test]
async fn test_issue_book_store_failure_leaves_state_unchanged() {
    let ctx = in_memory_context();
    let member = seed_member(&ctx.store, 0);
    let book = seed_book(&ctx.store, 2);
    ctx.store.set_fail_writes(true);

    let result = issue_book(&ctx.deps, issue_cmd(member.member_id, book.book_id, day(0))).await;

    assert!(matches!(
        result,
        Err(LendingApplicationError::TransactionRepositoryError(_))
    ));
    assert_eq!(ctx.store.book(book.book_id).unwrap().stock.value(), 2);
    assert!(ctx.store.all_transactions().is_empty());
}

// ============================================================================
// 返却
// ============================================================================

#[tokio::test]
async fn test_return_book_five_days_costs_fifty() {
    let ctx = in_memory_context();
    let member = seed_member(&ctx.store, 0);
    let book = seed_book(&ctx.store, 1);
    let transaction = issue_book(&ctx.deps, issue_cmd(member.member_id, book.book_id, day(0)))
        .await
        .unwrap();

    let receipt = return_book(
        &ctx.deps,
        ReturnBook {
            transaction_id: transaction.transaction_id,
            returned_on: day(5),
        },
    )
    .await
    .expect("return should succeed");

    assert_eq!(receipt.fee, Money::from_major(50));
    assert_eq!(receipt.transaction.return_date, Some(day(5)));
    assert_eq!(receipt.transaction.fee, Money::from_major(50));
    assert_eq!(receipt.outstanding_debt, Money::from_major(50));
    assert_eq!(receipt.debt_status, DebtStatus::WithinLimit);
    assert_eq!(
        ctx.store.member(member.member_id).unwrap().outstanding_debt,
        Money::from_major(50)
    );
}

#[tokio::test]
async fn test_return_book_same_day_is_free() {
    let ctx = in_memory_context();
    let member = seed_member(&ctx.store, 0);
    let book = seed_book(&ctx.store, 1);
    let transaction = issue_book(&ctx.deps, issue_cmd(member.member_id, book.book_id, day(2)))
        .await
        .unwrap();

    let receipt = return_book(
        &ctx.deps,
        ReturnBook {
            transaction_id: transaction.transaction_id,
            returned_on: day(2),
        },
    )
    .await
    .unwrap();

    assert_eq!(receipt.fee, Money::ZERO);
    assert_eq!(receipt.outstanding_debt, Money::ZERO);
}

#[tokio::test]
async fn test_return_book_does_not_restock() {
    let ctx = in_memory_context();
    let member = seed_member(&ctx.store, 0);
    let book = seed_book(&ctx.store, 1);
    let transaction = issue_book(&ctx.deps, issue_cmd(member.member_id, book.book_id, day(0)))
        .await
        .unwrap();

    return_book(
        &ctx.deps,
        ReturnBook {
            transaction_id: transaction.transaction_id,
            returned_on: day(1),
        },
    )
    .await
    .unwrap();

    assert_eq!(ctx.store.book(book.book_id).unwrap().stock.value(), 0);
}

#[tokio::test]
async fn test_return_book_twice_fails_without_double_charge() {
    let ctx = in_memory_context();
    let member = seed_member(&ctx.store, 0);
    let book = seed_book(&ctx.store, 1);
    let transaction = issue_book(&ctx.deps, issue_cmd(member.member_id, book.book_id, day(0)))
        .await
        .unwrap();

    let first = return_book(
        &ctx.deps,
        ReturnBook {
            transaction_id: transaction.transaction_id,
            returned_on: day(4),
        },
    )
    .await
    .unwrap();
    assert_eq!(first.fee, Money::from_major(40));

    let second = return_book(
        &ctx.deps,
        ReturnBook {
            transaction_id: transaction.transaction_id,
            returned_on: day(9),
        },
    )
    .await;

    assert!(matches!(second, Err(LendingApplicationError::AlreadyReturned)));
    assert_eq!(
        ctx.store.member(member.member_id).unwrap().outstanding_debt,
        Money::from_major(40)
    );
    let stored = ctx.store.all_transactions();
    assert_eq!(stored[0].fee, Money::from_major(40));
    assert_eq!(stored[0].return_date, Some(day(4)));
}

#[tokio::test]
async fn test_return_book_over_limit_still_succeeds_with_warning() {
    let ctx = in_memory_context();
    let member = seed_member(&ctx.store, 480);
    let book = seed_book(&ctx.store, 1);
    let transaction = issue_book(&ctx.deps, issue_cmd(member.member_id, book.book_id, day(0)))
        .await
        .unwrap();

    let receipt = return_book(
        &ctx.deps,
        ReturnBook {
            transaction_id: transaction.transaction_id,
            returned_on: day(3),
        },
    )
    .await
    .expect("return over the limit still succeeds");

    assert_eq!(receipt.fee, Money::from_major(30));
    assert_eq!(receipt.outstanding_debt, Money::from_major(510));
    assert_eq!(receipt.debt_status, DebtStatus::OverLimit);

    // 以後の貸出は拒否される
    let another = seed_book(&ctx.store, 1);
    let result = issue_book(&ctx.deps, issue_cmd(member.member_id, another.book_id, day(3))).await;
    assert!(matches!(result, Err(LendingApplicationError::DebtLimitExceeded)));
}

#[tokio::test]
async fn test_return_book_unknown_transaction() {
    let ctx = in_memory_context();

    let result = return_book(
        &ctx.deps,
        ReturnBook {
            transaction_id: TransactionId::new(),
            returned_on: day(0),
        },
    )
    .await;

    assert!(matches!(result, Err(LendingApplicationError::TransactionNotFound)));
}

#[tokio::test]
async fn test_return_book_store_failure_leaves_state_unchanged() {
    let ctx = in_memory_context();
    let member = seed_member(&ctx.store, 0);
    let book = seed_book(&ctx.store, 1);
    let transaction = issue_book(&ctx.deps, issue_cmd(member.member_id, book.book_id, day(0)))
        .await
        .unwrap();
    ctx.store.set_fail_writes(true);

    let result = return_book(
        &ctx.deps,
        ReturnBook {
            transaction_id: transaction.transaction_id,
            returned_on: day(7),
        },
    )
    .await;

    assert!(matches!(
        result,
        Err(LendingApplicationError::TransactionRepositoryError(_))
    ));
    assert_eq!(
        ctx.store.member(member.member_id).unwrap().outstanding_debt,
        Money::ZERO
    );
    assert!(ctx.store.all_transactions()[0].is_open());
}

#[tokio::test]
async fn test_return_book_rejects_unrepresentable_debt_update() {
    let ctx = in_memory_context();
    let member = seed_member(&ctx.store, 0);
    let book = seed_book(&ctx.store, 1);
    let transaction = issue_book(&ctx.deps, issue_cmd(member.member_id, book.book_id, day(0)))
        .await
        .unwrap();

    // 表現できない債務は更新リクエストの時点で拒否される
    let request = UpdateMemberRequest {
        name: member.name.clone(),
        email: member.email.clone(),
        outstanding_debt: Some(1e300),
    };
    assert!(request.to_command(member.member_id).is_err());

    let receipt = return_book(
        &ctx.deps,
        ReturnBook {
            transaction_id: transaction.transaction_id,
            returned_on: day(3),
        },
    )
    .await
    .expect("return should succeed");

    assert_eq!(receipt.outstanding_debt, Money::from_major(30));
}

#[tokio::test]
async fn test_return_book_debt_overflow_changes_nothing() {
    let ctx = in_memory_context();
    let member = seed_member(&ctx.store, 0);
    let book = seed_book(&ctx.store, 1);
    let transaction = issue_book(&ctx.deps, issue_cmd(member.member_id, book.book_id, day(0)))
        .await
        .unwrap();

    let saturated = Member {
        outstanding_debt: Money::from_minor(i64::MAX),
        ..member.clone()
    };
    ctx.store.add_member(saturated);

    let result = return_book(
        &ctx.deps,
        ReturnBook {
            transaction_id: transaction.transaction_id,
            returned_on: day(3),
        },
    )
    .await;

    assert!(matches!(result, Err(LendingApplicationError::DebtOverflow)));
    assert_eq!(
        ctx.store.member(member.member_id).unwrap().outstanding_debt,
        Money::from_minor(i64::MAX)
    );
    assert!(ctx.store.all_transactions()[0].is_open());
}

/// 取引の読み込み結果だけを固定し、書き込みはストアに委譲する
///
/// 2つの返却が同じ貸出中の取引を読み込んだ状況を再現する。
struct StaleTransactionReads {
    store: Arc<InMemoryCatalogStore>,
    snapshot: Transaction,
}

#[async_trait]
impl TransactionRepository for StaleTransactionReads {
    async fn get_by_id(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<Transaction>, Box<dyn std::error::Error + Send + Sync>> {
        Ok((transaction_id == self.snapshot.transaction_id).then(|| self.snapshot.clone()))
    }

    async fn list_views(
        &self,
    ) -> Result<Vec<TransactionView>, Box<dyn std::error::Error + Send + Sync>> {
        self.store.list_views().await
    }

    async fn commit_issue(
        &self,
        book: &Book,
        transaction: &Transaction,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.store.commit_issue(book, transaction).await
    }

    async fn commit_return(
        &self,
        transaction: &Transaction,
        member: &Member,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        self.store.commit_return(transaction, member).await
    }
}

#[tokio::test]
async fn test_return_book_losing_concurrent_return_is_already_returned() {
    let ctx = in_memory_context();
    let member = seed_member(&ctx.store, 0);
    let book = seed_book(&ctx.store, 1);
    let transaction = issue_book(&ctx.deps, issue_cmd(member.member_id, book.book_id, day(0)))
        .await
        .unwrap();

    let deps = ServiceDependencies {
        transaction_repository: Arc::new(StaleTransactionReads {
            store: ctx.store.clone(),
            snapshot: transaction.clone(),
        }),
        ..ctx.deps.clone()
    };
    let cmd = ReturnBook {
        transaction_id: transaction.transaction_id,
        returned_on: day(2),
    };

    return_book(&deps, cmd.clone()).await.expect("first return should succeed");
    let second = return_book(&deps, cmd).await;

    assert!(matches!(second, Err(LendingApplicationError::AlreadyReturned)));
    assert_eq!(
        ctx.store.member(member.member_id).unwrap().outstanding_debt,
        Money::from_major(20)
    );
}
