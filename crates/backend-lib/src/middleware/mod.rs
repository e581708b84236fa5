// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the `EventHub` server.

pub mod auth;

pub use auth::{parse_authorization, require_auth};
