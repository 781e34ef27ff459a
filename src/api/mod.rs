//! HTTP API: shared state, the request error boundary, and routes.

pub mod handlers;
pub mod routes;

pub use routes::configure;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::ai::{GroqClient, InferenceError};
use crate::db::{StorageBackend, StorageError};
use crate::models::prediction::ValidationError;

/// Shared application state, built once in `main` and injected into every
/// handler. Immutable after startup.
pub struct AppState {
    pub backend: StorageBackend,
    pub llm: GroqClient,
}

/// Error body shape shared by every failure response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// The single outer error boundary for request handling. Every failure in
/// validate -> infer -> persist maps here and shapes the HTTP response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Surfaces the provider's underlying message to the caller, matching
    /// the catch-all behavior this service has always had.
    #[error(transparent)]
    Inference(#[from] InferenceError),
    /// Append failures keep the cause out of the response body; it is
    /// logged instead.
    #[error("Failed to save prediction")]
    Save(StorageError),
    /// Read-back failures surface the backend's message.
    #[error("{0}")]
    Backend(StorageError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Inference(_) | ApiError::Save(_) | ApiError::Backend(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Save(cause) = self {
            tracing::error!(%cause, "failed to persist prediction record");
        }
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}
