mod errors;
mod lending_service;

pub use errors::{LendingApplicationError, Result};
pub use lending_service::{ReturnReceipt, issue_book, return_book};
