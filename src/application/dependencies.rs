use crate::ports::*;
use std::sync::Arc;

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 各サービス関数はこの構造体を引数で受け取り、ストアへの接続を
/// グローバル状態ではなく明示的な依存として扱う。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub book_repository: Arc<dyn BookRepository>,
    pub member_repository: Arc<dyn MemberRepository>,
    pub transaction_repository: Arc<dyn TransactionRepository>,
    pub catalog_api: Arc<dyn CatalogApi>,
}
