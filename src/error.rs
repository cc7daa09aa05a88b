// Error types for the filter core and the HTTP layer
// AppError converts into consistent error responses in Axum

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::saved_searches::SavedSearchError;

/// Static-configuration errors of the filter core.
///
/// User input never produces these; they surface only when a name coming from
/// outside (a route segment, a JSON body) does not match the registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown filter definition: {0}")]
    UnknownDefinition(String),
    #[error("unknown filter state key: {0}")]
    UnknownStateKey(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    InternalServerError(#[from] anyhow::Error),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
}

impl From<FilterError> for AppError {
    fn from(error: FilterError) -> Self {
        AppError::BadRequest(error.to_string())
    }
}

impl From<SavedSearchError> for AppError {
    fn from(error: SavedSearchError) -> Self {
        match error {
            SavedSearchError::NotFound(_) => AppError::NotFound(error.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::InternalServerError(e) => {
                // Log the detailed error here, don't expose it to the client
                tracing::error!("Internal server error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
            AppError::BadRequest(message) => {
                tracing::warn!("Bad request: {}", message);
                (StatusCode::BAD_REQUEST, "BAD_REQUEST")
            }
            AppError::NotFound(message) => {
                tracing::info!("Not found: {}", message);
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
        };

        let body = ErrorBody {
            error: code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// Custom Result type for handlers
pub type AppResult<T> = Result<T, AppError>;
