//! HTTP handlers.
use axum::extract::{rejection::JsonRejection, FromRequest};
use eventhub_common::FieldErrors;

use crate::error::AppError;

pub mod auth;
pub mod events;

/// `Json` extractor whose rejections become 422 validation errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert("body".to_string(), rejection.body_text());
        AppError::validation("Invalid request body.", errors)
    }
}
