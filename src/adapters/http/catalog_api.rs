//! 外部書籍カタログAPIのHTTPクライアント

use crate::ports::catalog_api::{
    CatalogApi as CatalogApiTrait, CatalogApiError, CatalogPage, CatalogRecord, Result,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// 既定のカタログエンドポイント
pub const DEFAULT_CATALOG_API_URL: &str = "https://frappe.io/api/method/frappe-library";

/// CatalogApiのreqwest実装
///
/// `GET <base>?page=<n>&title=<title>` を送信し、ステータス200で
/// `{ "message": [...] }` を受け取る。再試行はしない。
#[derive(Clone)]
pub struct CatalogApi {
    client: Client,
    base_url: String,
}

impl CatalogApi {
    /// タイムアウトなしのクライアントを作成
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// 任意のリクエストタイムアウト付きでクライアントを作成
    ///
    /// # エラー
    /// 内部のクライアントを構築できない場合は `CatalogApiError::Transport` を返す
    pub fn with_timeout(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CatalogApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CatalogApiTrait for CatalogApi {
    async fn fetch_page(&self, title: &str, page: u32) -> Result<Vec<CatalogRecord>> {
        tracing::debug!(page, title, "Requesting catalog page");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("page", page.to_string()), ("title", title.to_string())])
            .send()
            .await
            .map_err(|e| CatalogApiError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<CatalogPage>()
                .await
                .map(|body| body.message)
                .map_err(|e| CatalogApiError::Decode(e.to_string())),
            status => Err(CatalogApiError::Status(status.as_u16())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LIBRARY_PATH: &str = "/api/method/frappe-library";

    fn client_for(server: &MockServer) -> CatalogApi {
        CatalogApi::new(format!("{}{}", server.uri(), LIBRARY_PATH))
    }

    #[test]
    fn test_client_creation() {
        let client = CatalogApi::new(DEFAULT_CATALOG_API_URL);
        assert_eq!(client.base_url(), DEFAULT_CATALOG_API_URL);
    }

    #[test]
    fn test_client_with_timeout() {
        let client = CatalogApi::with_timeout("http://localhost", Some(Duration::from_secs(5)));
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_page_sends_page_and_title() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LIBRARY_PATH))
            .and(query_param("page", "2"))
            .and(query_param("title", "Harry Potter"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": [
                    {
                        "bookID": "1",
                        "title": "Harry Potter and the Half-Blood Prince",
                        "authors": "J.K. Rowling/Mary GrandPré",
                        "average_rating": "4.57"
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let records = client_for(&server)
            .fetch_page("Harry Potter", 2)
            .await
            .expect("Failed to fetch page");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Harry Potter and the Half-Blood Prince");
        assert_eq!(records[0].authors, "J.K. Rowling/Mary GrandPré");
        assert_eq!(records[0].average_rating, Some(4.57));
    }

    #[tokio::test]
    async fn test_fetch_page_non_200_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LIBRARY_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_page("Dune", 1).await;

        assert!(matches!(result, Err(CatalogApiError::Status(503))));
    }

    #[tokio::test]
    async fn test_fetch_page_invalid_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LIBRARY_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_page("Dune", 1).await;

        assert!(matches!(result, Err(CatalogApiError::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_page_unreachable_server_is_transport_error() {
        let client = CatalogApi::new("http://127.0.0.1:9/unreachable");

        let result = client.fetch_page("Dune", 1).await;

        assert!(matches!(result, Err(CatalogApiError::Transport(_))));
    }
}
