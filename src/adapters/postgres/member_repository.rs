use crate::domain::{Member, MemberId, Money};
use crate::ports::book_repository::DeleteOutcome;
use crate::ports::member_repository::{MemberRepository as MemberRepositoryTrait, Result};
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row, postgres::PgRow};

use super::unit_of_work::finish;

fn map_row_to_member(row: &PgRow) -> Member {
    Member {
        member_id: MemberId::from_uuid(row.get("member_id")),
        name: row.get("name"),
        email: row.get("email"),
        outstanding_debt: Money::from_minor(row.get("outstanding_debt")),
    }
}

/// MemberRepositoryのPostgreSQL実装
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    /// PostgreSQLコネクションプールから作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn delete_unreferenced(
        conn: &mut PgConnection,
        member_id: MemberId,
    ) -> Result<DeleteOutcome> {
        let referenced: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM transactions WHERE member_id = $1)",
        )
        .bind(member_id.value())
        .fetch_one(&mut *conn)
        .await?;

        if referenced {
            return Ok(DeleteOutcome::Referenced);
        }

        let result = sqlx::query("DELETE FROM members WHERE member_id = $1")
            .bind(member_id.value())
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
impl MemberRepositoryTrait for MemberRepository {
    async fn insert(&self, member: Member) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO members (member_id, name, email, outstanding_debt)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(member.member_id.value())
        .bind(&member.name)
        .bind(&member.email)
        .bind(member.outstanding_debt.minor_units())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_by_id(&self, member_id: MemberId) -> Result<Option<Member>> {
        let row = sqlx::query(
            r#"
            SELECT member_id, name, email, outstanding_debt
            FROM members
            WHERE member_id = $1
            "#,
        )
        .bind(member_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_member))
    }

    async fn list(&self) -> Result<Vec<Member>> {
        let rows = sqlx::query(
            r#"
            SELECT member_id, name, email, outstanding_debt
            FROM members
            ORDER BY name ASC, created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_member).collect())
    }

    async fn update(&self, member: Member) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE members
            SET name = $2, email = $3, outstanding_debt = $4
            WHERE member_id = $1
            "#,
        )
        .bind(member.member_id.value())
        .bind(&member.name)
        .bind(&member.email)
        .bind(member.outstanding_debt.minor_units())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 貸出取引から参照されていなければ会員を削除する
    async fn delete(&self, member_id: MemberId) -> Result<DeleteOutcome> {
        let mut tx = self.pool.begin().await?;
        let result = Self::delete_unreferenced(&mut *tx, member_id).await;
        finish(tx, result).await
    }
}
