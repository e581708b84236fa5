// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const SIGNUP_CREATED: &str = "auth.signup.created";
pub const LOGIN_SUCCEEDED: &str = "auth.login.succeeded";
pub const LOGIN_FAILED: &str = "auth.login.failed";
pub const GATE_REJECTED: &str = "auth.gate.rejected";
pub const EVENT_CREATED: &str = "event.created";
pub const EVENT_UPDATED: &str = "event.updated";
pub const EVENT_DELETED: &str = "event.deleted";
