use serde::{Deserialize, Serialize};

use super::value_objects::{BookId, Stock};

/// 書籍
///
/// 在庫数は貸出時にのみ減少する。返却では在庫を戻さない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    pub authors: String,
    pub rating: Option<f64>,
    pub stock: Stock,
}

impl Book {
    pub fn new(title: impl Into<String>, authors: impl Into<String>, rating: Option<f64>, stock: Stock) -> Self {
        Self {
            book_id: BookId::new(),
            title: title.into(),
            authors: authors.into(),
            rating,
            stock,
        }
    }
}
