mod errors;
mod import_service;

pub use errors::{ImportApplicationError, Result};
pub use import_service::{ImportOutcome, ImportReport, import_books};
