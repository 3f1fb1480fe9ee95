use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog browsing
        .route("/movies/trending", get(handlers::get_trending))
        .route("/movies/popular", get(handlers::get_popular))
        .route("/movies/search", get(handlers::search_movies))
        .route("/movies/discover", get(handlers::discover_movies))
        .route("/movies/:id", get(handlers::get_movie_details))
        .route("/genres", get(handlers::get_genres))
        // Recommendations
        .route("/recommendations", post(handlers::get_recommendations))
        // Explicit refresh: drop all cached catalog responses
        .route("/cache/refresh", post(handlers::refresh_cache))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
