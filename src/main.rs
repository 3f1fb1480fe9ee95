use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use reelrec_api::{create_router, AppState, Config, FetchCache, TmdbCatalog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // One cache shared by the catalog and the refresh route
    let cache = FetchCache::new();
    let catalog = TmdbCatalog::from_config(&config, cache.clone())?;
    let state = AppState::new(Arc::new(catalog), cache);

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
