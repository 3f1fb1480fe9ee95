/// TMDB-backed catalog client
///
/// Owns the exact query-parameter shape of the TMDB v3 API (api_key,
/// language, page, sort_by, vote_count.gte) and wraps every read in the
/// fetch cache with a key derived from the endpoint and its parameters.
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    cache::{CacheKey, FetchCache},
    catalog::CatalogClient,
    config::{CacheTtls, Config},
    error::{AppError, AppResult},
    models::{CandidateMovie, Genre, MovieDetails, SortBy},
};

/// Envelope for TMDB list endpoints
#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Vec<CandidateMovie>,
}

/// Envelope for the genre list endpoint
#[derive(Deserialize)]
struct GenreListResponse {
    #[serde(default)]
    genres: Vec<Genre>,
}

#[derive(Clone)]
pub struct TmdbCatalog {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: FetchCache,
    ttls: CacheTtls,
}

impl TmdbCatalog {
    /// Creates a TMDB catalog from application config and an injected cache
    pub fn from_config(config: &Config, cache: FetchCache) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.tmdb_api_key.clone(),
            api_url: config.tmdb_api_url.clone(),
            cache,
            ttls: config.cache_ttls(),
        })
    }

    /// Issues a GET to `path` with `params` plus the ambient api_key and
    /// language, and deserializes the JSON body
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", "en-US"),
            ])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(path = %path, status = %status, "TMDB request failed");
            return Err(AppError::Upstream(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl CatalogClient for TmdbCatalog {
    async fn discover_by_genre(
        &self,
        genre_id: u32,
        sort: SortBy,
        min_vote_count: u32,
    ) -> AppResult<Vec<CandidateMovie>> {
        let key = CacheKey::Discover {
            genre_id,
            sort,
            min_vote_count,
        };

        self.cache
            .get_or_fetch(&key, self.ttls.discover, || async move {
                let response: ListResponse = self
                    .get_json(
                        "/discover/movie",
                        &[
                            ("with_genres", genre_id.to_string()),
                            ("sort_by", sort.as_query_value().to_string()),
                            ("vote_count.gte", min_vote_count.to_string()),
                            ("page", "1".to_string()),
                        ],
                    )
                    .await?;

                tracing::info!(
                    genre_id,
                    count = response.results.len(),
                    "Fetched genre discovery results"
                );

                Ok(response.results)
            })
            .await
    }

    async fn trending(&self) -> AppResult<Vec<CandidateMovie>> {
        self.cache
            .get_or_fetch(&CacheKey::Trending, self.ttls.trending, || async {
                let response: ListResponse =
                    self.get_json("/trending/movie/week", &[]).await?;
                Ok(response.results)
            })
            .await
    }

    async fn popular(&self, page: u32) -> AppResult<Vec<CandidateMovie>> {
        let key = CacheKey::Popular { page };

        self.cache
            .get_or_fetch(&key, self.ttls.popular, || async move {
                let response: ListResponse = self
                    .get_json("/movie/popular", &[("page", page.to_string())])
                    .await?;
                Ok(response.results)
            })
            .await
    }

    async fn search(&self, query: &str) -> AppResult<Vec<CandidateMovie>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let key = CacheKey::Search(query.to_string());

        self.cache
            .get_or_fetch(&key, self.ttls.search, || async {
                let response: ListResponse = self
                    .get_json("/search/movie", &[("query", query.to_string())])
                    .await?;

                tracing::info!(
                    query = %query,
                    count = response.results.len(),
                    "Search results fetched"
                );

                Ok(response.results)
            })
            .await
    }

    async fn movie_details(&self, movie_id: u64) -> AppResult<MovieDetails> {
        let key = CacheKey::Details(movie_id);

        self.cache
            .get_or_fetch(&key, self.ttls.details, || async move {
                self.get_json(
                    &format!("/movie/{}", movie_id),
                    &[("append_to_response", "videos".to_string())],
                )
                .await
            })
            .await
    }

    async fn genres(&self) -> AppResult<Vec<Genre>> {
        self.cache
            .get_or_fetch(&CacheKey::Genres, self.ttls.genres, || async {
                let response: GenreListResponse =
                    self.get_json("/genre/movie/list", &[]).await?;
                Ok(response.genres)
            })
            .await
    }
}
