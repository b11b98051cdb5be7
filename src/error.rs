//! Typed errors and HTTP mapping.

use crate::service::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {key} '{value}': {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Carries the entity name, e.g. "Restaurant".
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("validation errors")]
    Validation(#[from] ValidationError),
    /// A write the store refused; the message is reported to the caller as-is.
    #[error("{0}")]
    Operation(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    /// Wrap a store error from a write path, keeping the database's own message when there is one.
    pub fn operation(e: sqlx::Error) -> Self {
        let message = match e.as_database_error() {
            Some(db) => db.message().to_string(),
            None => e.to_string(),
        };
        AppError::Operation(message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, crate::response::error_body(self.to_string())),
            AppError::Validation(e) => {
                tracing::warn!(reason = %e, "rejected request");
                (
                    StatusCode::BAD_REQUEST,
                    crate::response::errors_body(vec![self.to_string()]),
                )
            }
            AppError::Operation(message) => {
                tracing::warn!(%message, "operation failed");
                (
                    StatusCode::BAD_REQUEST,
                    crate::response::errors_body(vec![message.clone()]),
                )
            }
            AppError::Db(e) => {
                tracing::error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    crate::response::error_body(self.to_string()),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
