// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Input validation for event and signup bodies.
//!
//! Validators collect every failing field into a [`FieldErrors`] map so the
//! client can show all problems at once. Handlers run them before touching
//! storage.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use eventhub_common::{Credentials, EventInput, FieldErrors};
use regex::Regex;

use crate::auth::MIN_PASSWORD_LENGTH;

pub const EVENT_ADD_FAILED_MESSAGE: &str = "Adding the event failed due to validation errors.";
pub const EVENT_UPDATE_FAILED_MESSAGE: &str =
    "Updating the event failed due to validation errors.";
pub const SIGNUP_FAILED_MESSAGE: &str = "User signup failed due to validation errors.";

pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email.";
pub const EMAIL_EXISTS_MESSAGE: &str = "Email exists already.";
pub const INVALID_PASSWORD_MESSAGE: &str =
    "Invalid password. Must be at least 6 characters long.";

static IMAGE_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://.+\.(jpg|jpeg|png|gif|webp|svg)$").expect("static regex")
});

/// Non-empty after trimming, with at least `min_length` characters
pub fn is_valid_text(value: &str, min_length: usize) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.chars().count() >= min_length
}

/// A single calendar date (`2025-10-20`) or an RFC 3339 timestamp
pub fn is_valid_date(value: &str) -> bool {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
}

/// An http(s) URL pointing at a common image type
pub fn is_valid_image_url(value: &str) -> bool {
    IMAGE_URL_REGEX.is_match(value)
}

/// Minimal shape check: contains an `@`
pub fn is_valid_email(value: &str) -> bool {
    value.contains('@')
}

/// Field errors for an event body; empty when valid
pub fn validate_event_input(input: &EventInput) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if !is_valid_text(&input.title, 1) {
        errors.insert("title".to_string(), "Invalid title.".to_string());
    }
    if !is_valid_text(&input.description, 1) {
        errors.insert("description".to_string(), "Invalid description.".to_string());
    }
    if !is_valid_date(&input.date) {
        errors.insert("date".to_string(), "Invalid date.".to_string());
    }
    if !is_valid_image_url(&input.image) {
        errors.insert("image".to_string(), "Invalid image.".to_string());
    }
    errors
}

/// Shape checks for a signup body; the duplicate-email check happens in storage
pub fn validate_signup(credentials: &Credentials) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if !is_valid_email(&credentials.email) {
        errors.insert("email".to_string(), INVALID_EMAIL_MESSAGE.to_string());
    }
    if !is_valid_text(&credentials.password, MIN_PASSWORD_LENGTH) {
        errors.insert("password".to_string(), INVALID_PASSWORD_MESSAGE.to_string());
    }
    errors
}
