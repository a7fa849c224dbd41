use crate::domain::{IssueBookError, ReturnBookError};
use thiserror::Error;

/// 貸出管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum LendingApplicationError {
    /// 会員が存在しない
    #[error("Member not found")]
    MemberNotFound,

    /// 書籍が存在しない
    #[error("Book not found")]
    BookNotFound,

    /// 貸出取引が存在しない
    #[error("Transaction not found")]
    TransactionNotFound,

    /// 会員の延滞債務が上限（500）を超えている
    #[error("Member has exceeded the debt limit of 500")]
    DebtLimitExceeded,

    /// 在庫切れ
    #[error("Book out of stock")]
    OutOfStock,

    /// 既に返却済み
    #[error("Book already returned")]
    AlreadyReturned,

    /// 料金を加算すると債務が上限値を超える
    #[error("Member debt is too large to add the rental fee")]
    DebtOverflow,

    /// BookRepositoryのエラー
    #[error("Book repository error")]
    BookRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// MemberRepositoryのエラー
    #[error("Member repository error")]
    MemberRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// TransactionRepositoryのエラー（コミット失敗時はロールバック済み）
    #[error("Transaction repository error")]
    TransactionRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<IssueBookError> for LendingApplicationError {
    fn from(err: IssueBookError) -> Self {
        match err {
            IssueBookError::DebtLimitExceeded => LendingApplicationError::DebtLimitExceeded,
            IssueBookError::OutOfStock => LendingApplicationError::OutOfStock,
        }
    }
}

impl From<ReturnBookError> for LendingApplicationError {
    fn from(err: ReturnBookError) -> Self {
        match err {
            ReturnBookError::AlreadyReturned => LendingApplicationError::AlreadyReturned,
            ReturnBookError::DebtOverflow => LendingApplicationError::DebtOverflow,
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LendingApplicationError>;
