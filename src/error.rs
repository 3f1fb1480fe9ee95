use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("No liked movies provided: like at least one movie first")]
    EmptyInput,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream API returned status {0}")]
    Upstream(u16),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::EmptyInput => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Network(_) | AppError::Upstream(_) => {
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_maps_to_bad_request() {
        let response = AppError::EmptyInput.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_maps_to_bad_gateway() {
        let response = AppError::Upstream(503).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
