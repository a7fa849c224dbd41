use crate::application::ServiceDependencies;
use crate::domain::{Book, Stock, commands::ImportBooks};
use crate::ports::CatalogRecord;

use super::errors::{ImportApplicationError, Result};

/// 取り込み1件あたりの初期在庫
const IMPORTED_STOCK: u32 = 1;

/// 取り込みの終了理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// 目標件数に到達した
    Completed,
    /// 外部APIが失敗した（部分的成功）
    ApiFailure { page: u32, reason: String },
    /// 目標件数に達する前に空のページが返された
    Exhausted { page: u32 },
}

/// 取り込み結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub requested: usize,
    /// 外部APIへのリクエスト回数
    pub pages_requested: u32,
    pub outcome: ImportOutcome,
}

impl ImportReport {
    pub fn is_complete(&self) -> bool {
        matches!(self.outcome, ImportOutcome::Completed)
    }
}

fn to_book(record: CatalogRecord) -> Book {
    Book::new(
        record.title,
        record.authors,
        record.average_rating,
        Stock::new(IMPORTED_STOCK),
    )
}

/// 外部カタログから書籍を一括で取り込む
///
/// ページ1から順に取得し、目標件数に達した時点でページの途中でも停止する。
/// 各ページの書籍は1回のコミットで保存されるため、後続ページの取得に
/// 失敗しても以前のページは残る。外部APIの失敗は再試行せずに
/// ループを終了し、部分的成功として報告する。
///
/// # エラー
/// ページのコミットに失敗した場合のみ `PersistenceFailure` を返す
pub async fn import_books(deps: &ServiceDependencies, cmd: ImportBooks) -> Result<ImportReport> {
    let mut imported = 0;
    let mut page: u32 = 1;

    if cmd.target_count == 0 {
        return Ok(ImportReport {
            imported,
            requested: cmd.target_count,
            pages_requested: 0,
            outcome: ImportOutcome::Completed,
        });
    }

    let outcome = loop {
        let records = match deps.catalog_api.fetch_page(&cmd.title, page).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(page, imported, "Failed to fetch books from the catalog API: {}", e);
                break ImportOutcome::ApiFailure {
                    page,
                    reason: e.to_string(),
                };
            }
        };

        if records.is_empty() {
            tracing::info!(page, imported, "Catalog API returned an empty page");
            break ImportOutcome::Exhausted { page };
        }

        let remaining = cmd.target_count - imported;
        let books: Vec<Book> = records.into_iter().take(remaining).map(to_book).collect();
        let staged = books.len();

        deps.book_repository
            .insert_many(books)
            .await
            .map_err(|source| ImportApplicationError::PersistenceFailure { imported, source })?;

        imported += staged;
        tracing::debug!(page, staged, imported, "Imported catalog page");

        if imported >= cmd.target_count {
            break ImportOutcome::Completed;
        }
        page += 1;
    };

    tracing::info!(title = %cmd.title, imported, requested = cmd.target_count, "Import finished");

    Ok(ImportReport {
        imported,
        requested: cmd.target_count,
        pages_requested: page,
        outcome,
    })
}
