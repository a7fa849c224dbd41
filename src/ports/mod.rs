pub mod book_repository;
pub mod catalog_api;
pub mod member_repository;
pub mod transaction_repository;

pub use book_repository::{BookRepository, DeleteOutcome};
pub use catalog_api::{CatalogApi, CatalogApiError, CatalogRecord};
pub use member_repository::MemberRepository;
pub use transaction_repository::TransactionRepository;
