/// Catalog client abstraction
///
/// Wraps the external movie metadata API behind a trait so the
/// recommendation engine and the HTTP layer never see endpoint or
/// query-parameter details, and so tests can substitute a mock.
use crate::{
    error::AppResult,
    models::{CandidateMovie, Genre, MovieDetails, SortBy},
};

pub mod tmdb;

pub use tmdb::TmdbCatalog;

/// Read operations against the movie catalog
///
/// Every operation is an idempotent read eligible for the fetch cache;
/// implementations decide the cache key and freshness window per call.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Discover movies in a genre, ordered by the given sort, restricted to
    /// titles with at least `min_vote_count` votes
    async fn discover_by_genre(
        &self,
        genre_id: u32,
        sort: SortBy,
        min_vote_count: u32,
    ) -> AppResult<Vec<CandidateMovie>>;

    /// Movies trending this week
    async fn trending(&self) -> AppResult<Vec<CandidateMovie>>;

    /// The popular listing, one page at a time
    async fn popular(&self, page: u32) -> AppResult<Vec<CandidateMovie>>;

    /// Full-text title search
    async fn search(&self, query: &str) -> AppResult<Vec<CandidateMovie>>;

    /// Details for a single movie, with attached videos
    async fn movie_details(&self, movie_id: u64) -> AppResult<MovieDetails>;

    /// The catalog's genre list
    async fn genres(&self) -> AppResult<Vec<Genre>>;
}
