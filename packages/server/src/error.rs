use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::storage::StorageError;
use serde::Serialize;

use crate::store::StoreError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `NOT_FOUND`, `VALIDATION_ERROR`,
    /// `DATABASE_ERROR`, `STORAGE_ERROR`.
    #[schema(example = "NOT_FOUND")]
    pub code: &'static str,
    /// Human-readable error description. For server-side failures this is the
    /// underlying error message.
    #[schema(example = "Category not found")]
    pub message: String,
}

/// Application-level error type.
///
/// Anything other than a missing resource is a server-side failure and maps
/// to 500 with the raw cause echoed back.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Validation(String),
    Database(String),
    Storage(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Validation(msg) => {
                tracing::error!("Validation error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "VALIDATION_ERROR",
                        message: msg,
                    },
                )
            }
            AppError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "DATABASE_ERROR",
                        message: msg,
                    },
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Asset storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "STORAGE_ERROR",
                        message: msg,
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}
