// ============================
// eventhub-backend-lib/src/lib.rs
// ============================
//! Core backend functionality for the `EventHub` events catalog.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use eventhub_common::TOKEN_TTL_SECS;

use crate::auth::TokenService;
use crate::config::Settings;
use crate::storage::{FlatFileStorage, Storage};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Events and users
    pub storage: Arc<dyn Storage>,
    /// Token issuing and verification
    pub tokens: Arc<TokenService>,
    /// Settings
    pub settings: Arc<Settings>,
}

/// State handed to the router
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create a new application state
    pub fn new<S: Storage + 'static>(storage: S, settings: Settings) -> Self {
        // Fixed TTL: the client derives its own expiry from the same constant
        let tokens = Arc::new(TokenService::new(&settings.jwt_secret, TOKEN_TTL_SECS));

        Self {
            storage: Arc::new(storage),
            tokens,
            settings: Arc::new(settings),
        }
    }

    /// Create application state backed by the configured JSON document
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        settings.validate()?;
        let storage = FlatFileStorage::new(&settings.data_file)?;
        Ok(Self::new(storage, settings))
    }
}
