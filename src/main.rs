use library_lending::{
    adapters::{
        http::HttpCatalogApi,
        mock::InMemoryCatalogStore,
        postgres::{PostgresBookRepository, PostgresMemberRepository, PostgresTransactionRepository},
    },
    api::{handlers::AppState, router::create_router},
    application::ServiceDependencies,
    config::{AppConfig, StoreBackend},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_lending=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Initialize adapters
    let catalog_api = Arc::new(HttpCatalogApi::with_timeout(
        config.catalog_api_url.clone(),
        config.catalog_api_timeout,
    )?);
    tracing::info!("Catalog API: {}", catalog_api.base_url());

    let service_deps = match config.store_backend {
        StoreBackend::Postgres => {
            tracing::info!("Database URL: {}", config.database_url);

            // Initialize database connection pool
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(&config.database_url)
                .await?;

            sqlx::migrate!("./migrations").run(&pool).await?;

            ServiceDependencies {
                book_repository: Arc::new(PostgresBookRepository::new(pool.clone())),
                member_repository: Arc::new(PostgresMemberRepository::new(pool.clone())),
                transaction_repository: Arc::new(PostgresTransactionRepository::new(pool)),
                catalog_api,
            }
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");

            let store = Arc::new(InMemoryCatalogStore::new());
            ServiceDependencies {
                book_repository: store.clone(),
                member_repository: store.clone(),
                transaction_repository: store,
                catalog_api,
            }
        }
    };

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}
