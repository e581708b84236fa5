// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use eventhub_common::{ErrorResponse, FieldErrors};
use thiserror::Error;

/// Message sent for every 5xx reply
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong.";

/// Message sent when the access gate rejects a request
pub const NOT_AUTHENTICATED_MESSAGE: &str = "Not authenticated.";

/// Message sent when a login names an unknown email
pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed.";

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        errors: FieldErrors,
    },

    #[error("{0}")]
    NotAuthenticated(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

impl AppError {
    /// Build a validation error from a message and its field errors
    pub fn validation(message: impl Into<String>, errors: FieldErrors) -> Self {
        AppError::Validation {
            message: message.into(),
            errors,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotAuthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VAL_001",
            AppError::NotAuthenticated(_) => "AUTH_001",
            AppError::NotFound(_) => "NF_001",
            AppError::Internal(_) => "INT_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
            AppError::PasswordHash(_) => "AUTH_002",
        }
    }

    /// Get the message that is safe to send to a client.
    ///
    /// Client errors carry their own message; anything that maps to a 5xx
    /// collapses to [`GENERIC_ERROR_MESSAGE`].
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Validation { message, .. } => message.clone(),
            AppError::NotAuthenticated(message) | AppError::NotFound(message) => message.clone(),
            AppError::Internal(_)
            | AppError::Io(_)
            | AppError::Json(_)
            | AppError::PasswordHash(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// Convert into the JSON body sent to the client
    pub fn to_body(&self) -> ErrorResponse {
        let errors = match self {
            AppError::Validation { errors, .. } => Some(errors.clone()),
            _ => None,
        };
        ErrorResponse {
            message: self.sanitized_message(),
            code: Some(self.error_code().to_string()),
            errors,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }

        (status, axum::Json(self.to_body())).into_response()
    }
}

impl From<scrypt::password_hash::Error> for AppError {
    fn from(err: scrypt::password_hash::Error) -> Self {
        AppError::PasswordHash(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("background task failed: {err}"))
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}
