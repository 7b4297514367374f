use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::TitleError;

/// Request-terminating errors.
///
/// Binding, validation and storage failures all render as 400 with an
/// `{"error": ...}` body. `Unavailable` is reserved for the readiness probe.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Binding(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Storage(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Binding(_) | AppError::Validation(_) | AppError::Storage(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Binding(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Binding(rejection.body_text())
    }
}

impl From<TitleError> for AppError {
    fn from(err: TitleError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Storage(msg) = &self {
            tracing::warn!(error = %msg, "Storage operation failed");
        }

        let status = self.status();
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
