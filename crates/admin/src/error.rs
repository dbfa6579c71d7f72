//! Unified error handling with Sentry integration.
//!
//! Handlers return `Result<T, AppError>`. Store failures other than not-found
//! and conflict are captured to Sentry and answered with a generic
//! `{"error": "Database error"}`. Malformed bodies and query strings are
//! rejected through [`AppJson`] and [`AppQuery`] as a 400 in the same shape.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::UserInputError;

pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";
pub const DUPLICATE_EMAIL_MESSAGE: &str = "Email already exists";
pub const DATABASE_ERROR_MESSAGE: &str = "Database error";

/// Application-level error type for the admin API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] UserInputError),

    /// Storage operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match self {
            Self::Validation(err) => err.to_string(),
            Self::BadRequest(msg) => msg,
            Self::Repository(RepositoryError::NotFound) => USER_NOT_FOUND_MESSAGE.to_string(),
            Self::Repository(RepositoryError::Conflict(_)) => DUPLICATE_EMAIL_MESSAGE.to_string(),
            Self::Repository(_) => DATABASE_ERROR_MESSAGE.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// `Json` extractor whose rejection is an [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Query` extractor whose rejection is an [`AppError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_fields_is_400() {
        let (status, body) = body_of(UserInputError::MissingFields.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Name and email are required");
    }

    #[tokio::test]
    async fn test_not_found_is_404() {
        let (status, body) = body_of(RepositoryError::NotFound.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], USER_NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn test_conflict_is_409() {
        let (status, body) =
            body_of(RepositoryError::Conflict("email already exists".to_string()).into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], DUPLICATE_EMAIL_MESSAGE);
    }

    #[tokio::test]
    async fn test_database_error_is_sanitized() {
        let (status, body) = body_of(
            RepositoryError::DataCorruption("invalid email in database: row 12".to_string())
                .into(),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], DATABASE_ERROR_MESSAGE);
    }
}
