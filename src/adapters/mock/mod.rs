pub mod catalog_api;
pub mod catalog_store;

pub use catalog_api::CatalogApi as MockCatalogApi;
pub use catalog_store::CatalogStore as InMemoryCatalogStore;
