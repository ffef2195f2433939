//! Error types for the tutor service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::gemini::ModelError;
use crate::models::ErrorResponse;
use crate::storage::StorageError;

// == App Error Enum ==
/// Unified error type for the HTTP surface.
#[derive(Error, Debug)]
pub enum AppError {
    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The language model service failed or returned nothing usable
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Persistent storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The service is missing required configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        let message = err.to_string();
        match err {
            ModelError::MissingApiKey => AppError::Configuration(message),
            _ => AppError::Upstream(message),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) | AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the tutor service.
pub type Result<T> = std::result::Result<T, AppError>;
