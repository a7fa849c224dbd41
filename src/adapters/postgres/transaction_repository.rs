use crate::domain::{
    Book, BookId, Member, MemberId, Money, Transaction, TransactionId, TransactionView,
};
use crate::ports::transaction_repository::{
    Result, TransactionRepository as TransactionRepositoryTrait,
};
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row, postgres::PgRow};

use super::book_repository::stock_column;
use super::unit_of_work::{finish, invalid_data};

fn map_row_to_transaction(row: &PgRow) -> Transaction {
    Transaction {
        transaction_id: TransactionId::from_uuid(row.get("transaction_id")),
        member_id: MemberId::from_uuid(row.get("member_id")),
        book_id: BookId::from_uuid(row.get("book_id")),
        issue_date: row.get("issue_date"),
        return_date: row.get("return_date"),
        fee: Money::from_minor(row.get("fee")),
    }
}

/// TransactionRepositoryのPostgreSQL実装
///
/// 貸出・返却は複数テーブルを更新するため、それぞれ1つのトランザクション内で
/// 書き込み、失敗時は明示的にロールバックする。
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    /// PostgreSQLコネクションプールから作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn write_issue(
        conn: &mut PgConnection,
        book: &Book,
        transaction: &Transaction,
    ) -> Result<()> {
        let updated = sqlx::query("UPDATE books SET stock = $2 WHERE book_id = $1")
            .bind(book.book_id.value())
            .bind(stock_column(book.stock)?)
            .execute(&mut *conn)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(invalid_data(format!(
                "book {} disappeared while issuing",
                book.book_id.value()
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO transactions (
                transaction_id,
                member_id,
                book_id,
                issue_date,
                return_date,
                fee
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(transaction.transaction_id.value())
        .bind(transaction.member_id.value())
        .bind(transaction.book_id.value())
        .bind(transaction.issue_date)
        .bind(transaction.return_date)
        .bind(transaction.fee.minor_units())
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    async fn write_return(
        conn: &mut PgConnection,
        transaction: &Transaction,
        member: &Member,
    ) -> Result<bool> {
        // 貸出中の取引のみ返却できる
        let closed = sqlx::query(
            r#"
            UPDATE transactions
            SET return_date = $2, fee = $3
            WHERE transaction_id = $1 AND return_date IS NULL
            "#,
        )
        .bind(transaction.transaction_id.value())
        .bind(transaction.return_date)
        .bind(transaction.fee.minor_units())
        .execute(&mut *conn)
        .await?;

        if closed.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE members SET outstanding_debt = $2 WHERE member_id = $1")
            .bind(member.member_id.value())
            .bind(member.outstanding_debt.minor_units())
            .execute(&mut *conn)
            .await?;

        Ok(true)
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    async fn get_by_id(&self, transaction_id: TransactionId) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT transaction_id, member_id, book_id, issue_date, return_date, fee
            FROM transactions
            WHERE transaction_id = $1
            "#,
        )
        .bind(transaction_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_transaction))
    }

    /// 会員名・書籍タイトルを結合した取引一覧
    async fn list_views(&self) -> Result<Vec<TransactionView>> {
        let rows = sqlx::query(
            r#"
            SELECT
                t.transaction_id,
                t.member_id,
                t.book_id,
                t.issue_date,
                t.return_date,
                t.fee,
                m.name AS member_name,
                b.title AS book_title
            FROM transactions t
            JOIN members m ON m.member_id = t.member_id
            JOIN books b ON b.book_id = t.book_id
            ORDER BY t.issue_date DESC, t.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| TransactionView {
                transaction: map_row_to_transaction(row),
                member_name: row.get("member_name"),
                book_title: row.get("book_title"),
            })
            .collect())
    }

    async fn commit_issue(&self, book: &Book, transaction: &Transaction) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let result = Self::write_issue(&mut *tx, book, transaction).await;
        finish(tx, result).await
    }

    async fn commit_return(&self, transaction: &Transaction, member: &Member) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        let result = Self::write_return(&mut *tx, transaction, member).await;
        finish(tx, result).await
    }
}
