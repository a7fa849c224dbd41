use crate::domain::{Book, BookId, Stock};
use crate::ports::book_repository::{BookRepository as BookRepositoryTrait, DeleteOutcome, Result};
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row, postgres::PgRow};

use super::unit_of_work::{finish, invalid_data};

/// `books` の行を Book に変換する
///
/// `stock` はINTEGER列。負の値は不正データとして扱う。
pub(super) fn map_row_to_book(row: &PgRow) -> Result<Book> {
    let stock_i32: i32 = row.get("stock");
    let stock = Stock::try_from(i64::from(stock_i32))
        .map_err(|_| invalid_data(format!("stock out of range: {}", stock_i32)))?;

    Ok(Book {
        book_id: BookId::from_uuid(row.get("book_id")),
        title: row.get("title"),
        authors: row.get("authors"),
        rating: row.get("rating"),
        stock,
    })
}

pub(super) fn stock_column(stock: Stock) -> Result<i32> {
    i32::try_from(stock.value())
        .map_err(|_| invalid_data(format!("stock out of range: {}", stock.value())))
}

/// BookRepositoryのPostgreSQL実装
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    /// PostgreSQLコネクションプールから作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_batch(conn: &mut PgConnection, books: &[Book]) -> Result<()> {
        let mut ids = Vec::with_capacity(books.len());
        let mut titles = Vec::with_capacity(books.len());
        let mut authors = Vec::with_capacity(books.len());
        let mut ratings = Vec::with_capacity(books.len());
        let mut stocks = Vec::with_capacity(books.len());

        for book in books {
            ids.push(book.book_id.value());
            titles.push(book.title.clone());
            authors.push(book.authors.clone());
            ratings.push(book.rating);
            stocks.push(stock_column(book.stock)?);
        }

        // UNNESTによる一括INSERT
        sqlx::query(
            r#"
            INSERT INTO books (book_id, title, authors, rating, stock)
            SELECT * FROM UNNEST($1::uuid[], $2::text[], $3::text[], $4::float8[], $5::int4[])
            "#,
        )
        .bind(&ids)
        .bind(&titles)
        .bind(&authors)
        .bind(&ratings)
        .bind(&stocks)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    async fn delete_unreferenced(conn: &mut PgConnection, book_id: BookId) -> Result<DeleteOutcome> {
        let referenced: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM transactions WHERE book_id = $1)",
        )
        .bind(book_id.value())
        .fetch_one(&mut *conn)
        .await?;

        if referenced {
            return Ok(DeleteOutcome::Referenced);
        }

        let result = sqlx::query("DELETE FROM books WHERE book_id = $1")
            .bind(book_id.value())
            .execute(&mut *conn)
            .await?;

        Ok(if result.rows_affected() == 0 {
            DeleteOutcome::NotFound
        } else {
            DeleteOutcome::Deleted
        })
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn insert(&self, book: Book) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO books (book_id, title, authors, rating, stock)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(book.book_id.value())
        .bind(&book.title)
        .bind(&book.authors)
        .bind(book.rating)
        .bind(stock_column(book.stock)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// 全書籍を1つのトランザクションで登録する
    ///
    /// いずれかの行が失敗した場合は全体をロールバックする。
    async fn insert_many(&self, books: Vec<Book>) -> Result<()> {
        if books.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        let result = Self::insert_batch(&mut *tx, &books).await;
        finish(tx, result).await
    }

    async fn get_by_id(&self, book_id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT book_id, title, authors, rating, stock
            FROM books
            WHERE book_id = $1
            "#,
        )
        .bind(book_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_book).transpose()
    }

    async fn list(&self) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            r#"
            SELECT book_id, title, authors, rating, stock
            FROM books
            ORDER BY title ASC, created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_book).collect()
    }

    async fn update(&self, book: Book) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, authors = $3, rating = $4, stock = $5
            WHERE book_id = $1
            "#,
        )
        .bind(book.book_id.value())
        .bind(&book.title)
        .bind(&book.authors)
        .bind(book.rating)
        .bind(stock_column(book.stock)?)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 貸出取引から参照されていなければ書籍を削除する
    async fn delete(&self, book_id: BookId) -> Result<DeleteOutcome> {
        let mut tx = self.pool.begin().await?;
        let result = Self::delete_unreferenced(&mut *tx, book_id).await;
        finish(tx, result).await
    }
}
