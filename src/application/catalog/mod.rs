mod catalog_service;
mod errors;

pub use catalog_service::{
    IssueForm, add_book, add_member, delete_book, delete_member, get_book, get_member,
    issue_form, list_books, list_members, list_transactions, update_book, update_member,
};
pub use errors::{CatalogApplicationError, Result};
