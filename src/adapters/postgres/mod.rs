pub mod book_repository;
pub mod member_repository;
pub mod transaction_repository;
mod unit_of_work;

// パブリックに型を再エクスポート
pub use book_repository::BookRepository as PostgresBookRepository;
pub use member_repository::MemberRepository as PostgresMemberRepository;
pub use transaction_repository::TransactionRepository as PostgresTransactionRepository;
