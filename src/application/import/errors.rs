use thiserror::Error;

/// 一括取り込みアプリケーション層のエラー
///
/// 外部APIの失敗はエラーではなく ImportOutcome::ApiFailure として報告される。
/// ここに現れるのはストアへのコミット失敗のみ。
#[derive(Debug, Error)]
pub enum ImportApplicationError {
    /// ページのコミットに失敗した（そのページはロールバック済み、以前のページは保存済み）
    #[error("Failed to persist imported books after {imported} were saved")]
    PersistenceFailure {
        imported: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, ImportApplicationError>;
