use crate::domain::{Book, BookId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 削除操作の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// 削除した
    Deleted,
    /// 対象が存在しない
    NotFound,
    /// 貸出取引から参照されているため削除しない
    Referenced,
}

/// 書籍リポジトリポート
///
/// 書籍テーブルのCRUDを抽象化する。
/// 各メソッドは1回のコミットで完結する。
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// 書籍を1冊登録する
    async fn insert(&self, book: Book) -> Result<()>;

    /// 複数の書籍を1回のコミットで登録する
    ///
    /// 一括取り込みのページ単位の永続化に使用される。
    /// 途中で失敗した場合はすべてロールバックされる。
    async fn insert_many(&self, books: Vec<Book>) -> Result<()>;

    async fn get_by_id(&self, book_id: BookId) -> Result<Option<Book>>;

    /// 全書籍をタイトル順で取得する
    async fn list(&self) -> Result<Vec<Book>>;

    /// 書籍を上書き更新する。存在しない場合は false
    async fn update(&self, book: Book) -> Result<bool>;

    async fn delete(&self, book_id: BookId) -> Result<DeleteOutcome>;
}
