use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Timeout for each upstream HTTP request, in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Freshness window for trending results, in seconds
    #[serde(default = "default_trending_ttl_secs")]
    pub trending_ttl_secs: u64,

    /// Freshness window for popular results, in seconds
    #[serde(default = "default_popular_ttl_secs")]
    pub popular_ttl_secs: u64,

    /// Freshness window for search results, in seconds
    #[serde(default = "default_search_ttl_secs")]
    pub search_ttl_secs: u64,

    /// Freshness window for genre-discovery results, in seconds
    #[serde(default = "default_discover_ttl_secs")]
    pub discover_ttl_secs: u64,

    /// Freshness window for movie details, in seconds
    #[serde(default = "default_details_ttl_secs")]
    pub details_ttl_secs: u64,

    /// Freshness window for the genre list, in seconds
    #[serde(default = "default_genres_ttl_secs")]
    pub genres_ttl_secs: u64,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_http_timeout_secs() -> u64 {
    10
}

// Trending churns fastest; details and the genre list barely change.
fn default_trending_ttl_secs() -> u64 {
    600
}

fn default_popular_ttl_secs() -> u64 {
    1800
}

fn default_search_ttl_secs() -> u64 {
    3600
}

fn default_discover_ttl_secs() -> u64 {
    1800
}

fn default_details_ttl_secs() -> u64 {
    86400
}

fn default_genres_ttl_secs() -> u64 {
    86400
}

/// Per-category freshness windows handed to the catalog client
///
/// Max-age is caller-supplied per cache lookup, so each logical category
/// gets its own window without the cache knowing about categories.
#[derive(Debug, Clone, Copy)]
pub struct CacheTtls {
    pub trending: Duration,
    pub popular: Duration,
    pub search: Duration,
    pub discover: Duration,
    pub details: Duration,
    pub genres: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn cache_ttls(&self) -> CacheTtls {
        CacheTtls {
            trending: Duration::from_secs(self.trending_ttl_secs),
            popular: Duration::from_secs(self.popular_ttl_secs),
            search: Duration::from_secs(self.search_ttl_secs),
            discover: Duration::from_secs(self.discover_ttl_secs),
            details: Duration::from_secs(self.details_ttl_secs),
            genres: Duration::from_secs(self.genres_ttl_secs),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
