pub mod fetch_cache;

pub use fetch_cache::CacheKey;
pub use fetch_cache::Clock;
pub use fetch_cache::FetchCache;
pub use fetch_cache::SystemClock;
