// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between the `EventHub` client and server.
//! This module defines the JSON request/response bodies of the HTTP API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Lifetime of an issued token, in seconds.
///
/// The server signs tokens with this TTL and the client computes its own
/// expiry with the same value, so both sides must agree on it.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

/// Field name → message map returned with validation failures
pub type FieldErrors = BTreeMap<String, String>;

/// A stored community event
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Opaque unique identifier, assigned by the server
    pub id: String,
    pub title: String,
    pub description: String,
    /// Calendar date (`YYYY-MM-DD`) or RFC 3339 timestamp
    pub date: String,
    /// Absolute URL of the event picture
    pub image: String,
}

/// Body of `POST /events` and `PATCH /events/{id}`
///
/// Missing fields deserialize as empty strings so they surface as
/// field-level validation errors instead of body rejections.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub date: String,
    pub image: String,
}

impl EventInput {
    /// Attach an id, producing the stored form
    pub fn into_event(self, id: String) -> Event {
        Event {
            id,
            title: self.title,
            description: self.description,
            date: self.date,
            image: self.image,
        }
    }
}

/// Body of `POST /signup` and `POST /login`
#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Public view of a user account
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
}

/// `201` reply to a successful signup
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SignupResponse {
    pub message: String,
    pub user: UserSummary,
    pub token: String,
}

/// `200` reply to a successful login
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginResponse {
    pub token: String,
}

/// `GET /events`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EventsResponse {
    pub events: Vec<Event>,
}

/// `GET /events/{id}`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EventResponse {
    pub event: Event,
}

/// Reply to a create or update
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EventMutationResponse {
    pub message: String,
    pub event: Event,
}

/// Reply carrying only a message (delete)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of every non-2xx reply
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ErrorResponse {
    pub message: String,
    /// Stable machine-readable error code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Field-level messages, present on validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}
