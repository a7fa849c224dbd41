use crate::adapters::http::catalog_api::DEFAULT_CATALOG_API_URL;
use std::time::Duration;
use thiserror::Error;

/// 設定読み込みのエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("STORE_BACKEND must be 'postgres' or 'memory', got {0:?}")]
    InvalidStoreBackend(String),
}

/// カタログストアの実装
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// インメモリ（再起動で消える。ローカル動作確認用）
    Memory,
}

/// アプリケーション設定
///
/// 環境変数から読み込む。未設定の項目は既定値を使う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub catalog_api_url: String,
    /// 未設定の場合はタイムアウトなし
    pub catalog_api_timeout: Option<Duration>,
    pub store_backend: StoreBackend,
}

impl AppConfig {
    /// プロセスの環境変数から読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の参照関数から読み込む
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = match lookup("STORE_BACKEND").as_deref() {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => return Err(ConfigError::InvalidStoreBackend(other.to_string())),
        };

        let catalog_api_timeout = parse_number::<u64>(&lookup, "CATALOG_API_TIMEOUT_SECS")?
            .map(Duration::from_secs);

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "postgres://localhost/library".into()),
            database_max_connections: parse_number(&lookup, "DATABASE_MAX_CONNECTIONS")?
                .unwrap_or(5),
            port: parse_number(&lookup, "PORT")?.unwrap_or(3000),
            catalog_api_url: lookup("CATALOG_API_URL")
                .unwrap_or_else(|| DEFAULT_CATALOG_API_URL.into()),
            catalog_api_timeout,
            store_backend,
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidNumber { name, value })
        })
        .transpose()
}
