use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::SortBy;

/// Cache key for a catalog read, derived from the endpoint and its parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Trending,
    Popular { page: u32 },
    Search(String),
    Discover { genre_id: u32, sort: SortBy, min_vote_count: u32 },
    Details(u64),
    Genres,
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Trending => write!(f, "trending"),
            CacheKey::Popular { page } => write!(f, "popular:{}", page),
            CacheKey::Search(query) => write!(f, "search:{}", query.to_lowercase()),
            CacheKey::Discover { genre_id, sort, min_vote_count } => {
                write!(f, "discover:{}:{}:{}", genre_id, sort, min_vote_count)
            }
            CacheKey::Details(id) => write!(f, "details:{}", id),
            CacheKey::Genres => write!(f, "genres"),
        }
    }
}

/// Time source for freshness checks, injectable so tests can drive it
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Default clock backed by the monotonic system timer
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry {
    payload: serde_json::Value,
    stored_at: Instant,
}

/// In-memory memoization of idempotent catalog reads with per-call max-age
///
/// An entry is valid only while `now - stored_at < max_age`; once past that
/// it is treated as absent and overwritten by the next successful fetch
/// (lazy eviction). Entries live for the life of the process.
///
/// Two logically-identical requests that race before either completes may
/// both invoke their fetch function; in-flight requests are deliberately not
/// deduplicated.
#[derive(Clone)]
pub struct FetchCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    clock: Arc<dyn Clock>,
}

impl Default for FetchCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchCache {
    /// Creates an empty cache on the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty cache on the given clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Returns the cached payload for `key` if it is fresher than `max_age`,
    /// otherwise runs `fetch_fn` and stores its result under `key`.
    ///
    /// The cache is written only on success: a failed refresh propagates the
    /// error and leaves any prior entry in place.
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        key: &CacheKey,
        max_age: Duration,
        fetch_fn: F,
    ) -> AppResult<T>
    where
        T: serde::Serialize + serde::de::DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let key = key.to_string();

        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&key) {
                let age = self.clock.now().saturating_duration_since(entry.stored_at);
                if age < max_age {
                    tracing::debug!(key = %key, age_secs = age.as_secs(), "Cache hit");
                    let payload = entry.payload.clone();
                    drop(entries);
                    return serde_json::from_value(payload).map_err(|e| {
                        AppError::Internal(format!("Cache deserialization error: {}", e))
                    });
                }
            }
        }

        tracing::debug!(key = %key, "Cache miss");

        let value = fetch_fn().await?;

        let payload = serde_json::to_value(&value)
            .map_err(|e| AppError::Internal(format!("Cache serialization error: {}", e)))?;
        let entry = CacheEntry {
            payload,
            stored_at: self.clock.now(),
        };
        self.entries.write().await.insert(key, entry);

        Ok(value)
    }

    /// Clears every entry; the next lookup per key fetches fresh data
    pub async fn invalidate_all(&self) {
        let mut entries = self.entries.write().await;
        let evicted = entries.len();
        entries.clear();
        tracing::info!(evicted, "Cache invalidated");
    }
}
