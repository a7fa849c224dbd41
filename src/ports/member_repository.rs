use crate::domain::{Member, MemberId};
use async_trait::async_trait;

use super::book_repository::DeleteOutcome;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 会員リポジトリポート
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn insert(&self, member: Member) -> Result<()>;

    async fn get_by_id(&self, member_id: MemberId) -> Result<Option<Member>>;

    /// 全会員を名前順で取得する
    async fn list(&self) -> Result<Vec<Member>>;

    /// 会員を上書き更新する。存在しない場合は false
    async fn update(&self, member: Member) -> Result<bool>;

    async fn delete(&self, member_id: MemberId) -> Result<DeleteOutcome>;
}
