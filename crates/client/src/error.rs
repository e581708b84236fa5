use eventhub_common::{ErrorResponse, FieldErrors};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{message}")]
    Validation { message: String, errors: FieldErrors },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Unexpected response (status {status}): {message}")]
    Unexpected { status: u16, message: String },

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Session expired")]
    SessionExpired,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Maximum length for raw response bodies echoed into error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ClientError {
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Map a non-2xx reply to an error, using the server's JSON body when present
    pub fn from_status(status: u16, body: &str) -> Self {
        let parsed: Option<ErrorResponse> = serde_json::from_str(body).ok();
        let message = parsed
            .as_ref()
            .map(|b| b.message.clone())
            .unwrap_or_else(|| Self::truncate_body(body));

        match status {
            401 => ClientError::Unauthorized(message),
            404 => ClientError::NotFound(message),
            422 => ClientError::Validation {
                message,
                errors: parsed.and_then(|b| b.errors).unwrap_or_default(),
            },
            500..=599 => ClientError::Server(message),
            _ => ClientError::Unexpected { status, message },
        }
    }
}
