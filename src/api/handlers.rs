use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{CandidateMovie, Genre, LikedMovie, MovieDetails, Recommendation, SortBy};
use crate::services::{self, DEFAULT_LIMIT};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct PopularParams {
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct DiscoverParams {
    pub genre_id: u32,
    #[serde(default = "default_sort")]
    pub sort: SortBy,
    #[serde(default = "default_min_vote_count")]
    pub min_vote_count: u32,
}

fn default_sort() -> SortBy {
    SortBy::PopularityDesc
}

fn default_min_vote_count() -> u32 {
    100
}

/// Recommendation request: the client owns the liked set and sends it along
#[derive(Debug, Deserialize)]
pub struct RecommendationsRequest {
    pub liked: Vec<LikedMovie>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub results: Vec<CandidateMovie>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Movies trending this week
pub async fn get_trending(State(state): State<AppState>) -> AppResult<Json<MoviesResponse>> {
    let results = state.catalog.trending().await?;
    Ok(Json(MoviesResponse { results }))
}

/// A page of the popular listing
pub async fn get_popular(
    State(state): State<AppState>,
    Query(params): Query<PopularParams>,
) -> AppResult<Json<MoviesResponse>> {
    let results = state.catalog.popular(params.page).await?;
    Ok(Json(MoviesResponse { results }))
}

/// Full-text title search
pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<MoviesResponse>> {
    let results = state.catalog.search(&params.query).await?;
    Ok(Json(MoviesResponse { results }))
}

/// Genre discovery with optional sort and vote-count floor
pub async fn discover_movies(
    State(state): State<AppState>,
    Query(params): Query<DiscoverParams>,
) -> AppResult<Json<MoviesResponse>> {
    let results = state
        .catalog
        .discover_by_genre(params.genre_id, params.sort, params.min_vote_count)
        .await?;
    Ok(Json(MoviesResponse { results }))
}

/// Details for a single movie, including videos for the trailer lookup
pub async fn get_movie_details(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<MovieDetails>> {
    let details = state.catalog.movie_details(id).await?;
    Ok(Json(details))
}

/// The catalog's genre list
pub async fn get_genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.catalog.genres().await?;
    Ok(Json(genres))
}

/// Ranked recommendations from the client's liked set
pub async fn get_recommendations(
    State(state): State<AppState>,
    Json(request): Json<RecommendationsRequest>,
) -> AppResult<Json<RecommendationsResponse>> {
    let limit = match request.limit {
        Some(0) => {
            return Err(AppError::InvalidInput("Limit must be positive".to_string()));
        }
        Some(limit) => limit,
        None => DEFAULT_LIMIT,
    };

    let recommendations =
        services::recommend(state.catalog.clone(), &request.liked, limit).await?;

    Ok(Json(RecommendationsResponse { recommendations }))
}

/// Clears every cached catalog response
pub async fn refresh_cache(State(state): State<AppState>) -> StatusCode {
    state.cache.invalidate_all().await;
    StatusCode::NO_CONTENT
}
