use std::sync::Arc;

use crate::cache::FetchCache;
use crate::catalog::CatalogClient;

/// Shared application state
///
/// The catalog is the only collaborator handlers talk to; the cache handle
/// is kept alongside it so the explicit refresh action can clear entries.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogClient>,
    pub cache: FetchCache,
}

impl AppState {
    /// Creates application state around an injected catalog and cache
    pub fn new(catalog: Arc<dyn CatalogClient>, cache: FetchCache) -> Self {
        Self { catalog, cache }
    }
}
