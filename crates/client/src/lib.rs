//! Client library for the `EventHub` API.
//!
//! Holds the signed-in session the way a browser would (token plus an
//! absolute expiry in durable storage), schedules the automatic logout at
//! that expiry, and talks to the server with the session passed in
//! explicitly on every authorized call.

pub mod api;
pub mod error;
pub mod session;
pub mod store;
pub mod timer;

pub use api::{ApiClient, AuthMode, AuthOutcome};
pub use error::ClientError;
pub use session::{SessionContext, SessionTracker, TokenState};
pub use store::{DurableStore, FileStore, MemoryStore};
pub use timer::AutoLogout;
