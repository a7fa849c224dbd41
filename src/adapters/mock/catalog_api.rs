use crate::ports::catalog_api::{CatalogApi as CatalogApiTrait, CatalogApiError, CatalogRecord, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

enum ScriptedPage {
    Records(Vec<CatalogRecord>),
    Status(u16),
}

/// CatalogApiのモック実装
///
/// 登録したページを返し、すべてのリクエストを記録する。
/// 登録されていないページは空で返す。
pub struct CatalogApi {
    pages: Mutex<HashMap<u32, ScriptedPage>>,
    requests: Mutex<Vec<(String, u32)>>,
}

impl CatalogApi {
    pub fn new() -> Self {
        Self {
            pages: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// テスト用に `page` のレコードを登録
    pub fn add_page(&self, page: u32, records: Vec<CatalogRecord>) {
        self.pages
            .lock()
            .unwrap()
            .insert(page, ScriptedPage::Records(records));
    }

    /// `page` を200以外のステータスで失敗させる
    pub fn fail_page(&self, page: u32, status: u16) {
        self.pages
            .lock()
            .unwrap()
            .insert(page, ScriptedPage::Status(status));
    }

    /// 受け付けたリクエスト（タイトル, ページ）
    pub fn requests(&self) -> Vec<(String, u32)> {
        self.requests.lock().unwrap().clone()
    }

    /// ページ登録用に `count` 件のレコードを作成
    pub fn sample_records(prefix: &str, count: usize) -> Vec<CatalogRecord> {
        (1..=count)
            .map(|i| CatalogRecord {
                title: format!("{} {}", prefix, i),
                authors: "Sample Author".to_string(),
                average_rating: Some(4.0),
            })
            .collect()
    }
}

impl Default for CatalogApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogApiTrait for CatalogApi {
    async fn fetch_page(&self, title: &str, page: u32) -> Result<Vec<CatalogRecord>> {
        self.requests.lock().unwrap().push((title.to_string(), page));

        match self.pages.lock().unwrap().get(&page) {
            Some(ScriptedPage::Records(records)) => Ok(records.clone()),
            Some(ScriptedPage::Status(status)) => Err(CatalogApiError::Status(*status)),
            None => Ok(Vec::new()),
        }
    }
}
