pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use api::{create_router, AppState};
pub use cache::FetchCache;
pub use catalog::{CatalogClient, TmdbCatalog};
pub use config::Config;
pub use error::{AppError, AppResult};
