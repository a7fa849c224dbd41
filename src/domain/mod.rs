pub mod book;
pub mod commands;
pub mod errors;
pub mod lending;
pub mod member;
pub mod transaction;
pub mod value_objects;

pub use book::Book;
pub use errors::*;
pub use member::Member;
pub use transaction::{Transaction, TransactionView};
pub use value_objects::*;
