use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// 外部カタログAPIが返す書籍レコード
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogRecord {
    pub title: String,
    #[serde(default)]
    pub authors: String,
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub average_rating: Option<f64>,
}

/// 外部カタログAPIのページレスポンス
#[derive(Debug, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub message: Vec<CatalogRecord>,
}

/// average_rating は数値でも数値文字列でも届く。解釈できない値は評価なし扱い
fn deserialize_rating<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRating {
        Number(f64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<RawRating>::deserialize(deserializer)? {
        Some(RawRating::Number(value)) => Some(value),
        Some(RawRating::Text(text)) => text.trim().parse::<f64>().ok(),
        Some(RawRating::Other(_)) | None => None,
    })
}

/// 外部カタログAPIのエラー
#[derive(Debug, Error)]
pub enum CatalogApiError {
    /// 200以外のステータス
    #[error("catalog API returned status {0}")]
    Status(u16),

    /// 通信エラー
    #[error("catalog API request failed: {0}")]
    Transport(String),

    /// レスポンス本文を解釈できない
    #[error("catalog API response could not be decoded: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, CatalogApiError>;

/// 外部カタログAPIポート
///
/// タイトルで絞り込んだ書籍レコードをページ単位で取得する。
/// ページ番号は1始まり。
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_page(&self, title: &str, page: u32) -> Result<Vec<CatalogRecord>>;
}
