use thiserror::Error;

/// 書籍・会員管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum CatalogApplicationError {
    /// 書籍が存在しない
    #[error("Book not found")]
    BookNotFound,

    /// 会員が存在しない
    #[error("Member not found")]
    MemberNotFound,

    /// 貸出取引から参照されている書籍は削除できない
    #[error("Book has lending transactions and cannot be deleted")]
    BookHasTransactions,

    /// 貸出取引から参照されている会員は削除できない
    #[error("Member has lending transactions and cannot be deleted")]
    MemberHasTransactions,

    /// 入力値が不正
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// BookRepositoryのエラー
    #[error("Book repository error")]
    BookRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// MemberRepositoryのエラー
    #[error("Member repository error")]
    MemberRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// TransactionRepositoryのエラー
    #[error("Transaction repository error")]
    TransactionRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, CatalogApplicationError>;
