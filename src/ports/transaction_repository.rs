use crate::domain::{Book, Member, Transaction, TransactionId, TransactionView};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出取引リポジトリポート
///
/// 貸出・返却は複数テーブルにまたがる更新を伴うため、
/// 作業単位ごとに1回のコミットで永続化するメソッドを提供する。
/// 失敗時は実装側で明示的にロールバックし、状態を変更しない。
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn get_by_id(&self, transaction_id: TransactionId) -> Result<Option<Transaction>>;

    /// 会員名・書籍タイトルを結合した取引一覧（貸出日の新しい順）
    async fn list_views(&self) -> Result<Vec<TransactionView>>;

    /// 貸出を確定する
    ///
    /// 在庫を減らした書籍の保存と新規取引の作成を同一コミットで行う。
    async fn commit_issue(&self, book: &Book, transaction: &Transaction) -> Result<()>;

    /// 返却を確定する
    ///
    /// 返却済み取引の保存と会員債務の更新を同一コミットで行う。
    /// 取引が既に返却済みだった場合は何も変更せず false を返す。
    async fn commit_return(&self, transaction: &Transaction, member: &Member) -> Result<bool>;
}
