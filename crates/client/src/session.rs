//! Client-side session tracking.
//!
//! The tracker stores the token and an absolute expiry it computes itself
//! (now + [`TOKEN_TTL_SECS`]) rather than decoding the token, so the TTL
//! must match the server's.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use eventhub_common::TOKEN_TTL_SECS;

use crate::error::ClientError;
use crate::store::{DurableStore, EXPIRATION_KEY, TOKEN_KEY};

/// What the client knows about its token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    /// Never logged in, or logged out
    Absent,
    /// A token is stored but its expiry has passed
    Expired,
    /// A token that is still within its lifetime
    Valid(String),
}

impl TokenState {
    /// String form of [`TokenState::Expired`]
    pub const EXPIRED_SENTINEL: &'static str = "EXPIRED";

    /// `None` when absent, the sentinel when expired, the token otherwise
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TokenState::Absent => None,
            TokenState::Expired => Some(Self::EXPIRED_SENTINEL),
            TokenState::Valid(token) => Some(token),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, TokenState::Valid(_))
    }

    /// The token, only while valid
    pub fn token(&self) -> Option<&str> {
        match self {
            TokenState::Valid(token) => Some(token),
            _ => None,
        }
    }
}

impl fmt::Display for TokenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenState::Absent => f.write_str("absent"),
            TokenState::Expired => f.write_str(Self::EXPIRED_SENTINEL),
            TokenState::Valid(_) => f.write_str("valid"),
        }
    }
}

/// Snapshot of the session handed to API calls that need authorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    state: TokenState,
}

impl SessionContext {
    pub fn new(state: TokenState) -> Self {
        Self { state }
    }

    /// A context with no session
    pub fn anonymous() -> Self {
        Self::new(TokenState::Absent)
    }

    pub fn state(&self) -> &TokenState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_valid()
    }

    /// `Authorization` header value for this session
    pub fn bearer(&self) -> Result<String, ClientError> {
        match &self.state {
            TokenState::Valid(token) => Ok(format!("Bearer {token}")),
            TokenState::Expired => Err(ClientError::SessionExpired),
            TokenState::Absent => Err(ClientError::NotLoggedIn),
        }
    }
}

/// Reads and writes the persisted token and its expiry
#[derive(Clone)]
pub struct SessionTracker {
    store: Arc<dyn DurableStore>,
    ttl: Duration,
}

impl SessionTracker {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self::with_ttl(store, Duration::seconds(TOKEN_TTL_SECS))
    }

    pub fn with_ttl(store: Arc<dyn DurableStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Milliseconds until expiry; `-1` if no readable expiry is stored.
    /// Negative once expired.
    pub fn get_duration(&self) -> i64 {
        self.get_duration_at(Utc::now())
    }

    pub fn get_duration_at(&self, now: DateTime<Utc>) -> i64 {
        match self.expiration() {
            Some(expiry) => (expiry - now).num_milliseconds(),
            None => -1,
        }
    }

    /// The stored expiry, if present and parseable
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        let raw = self.store.get(EXPIRATION_KEY)?;
        DateTime::parse_from_rfc3339(&raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn get_token(&self) -> TokenState {
        self.get_token_at(Utc::now())
    }

    pub fn get_token_at(&self, now: DateTime<Utc>) -> TokenState {
        let Some(token) = self.store.get(TOKEN_KEY) else {
            return TokenState::Absent;
        };
        if self.get_duration_at(now) < 0 {
            return TokenState::Expired;
        }
        TokenState::Valid(token)
    }

    /// Persist `token` with an expiry one TTL from now; returns the expiry
    /// exactly as stored (millisecond precision)
    pub fn set_session(&self, token: &str) -> Result<DateTime<Utc>, ClientError> {
        self.set_session_at(token, Utc::now())
    }

    pub fn set_session_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, ClientError> {
        let expiry = (now + self.ttl).trunc_subsecs(3);
        let stamp = expiry.to_rfc3339_opts(SecondsFormat::Millis, true);
        self.store
            .set_all(&[(TOKEN_KEY, token), (EXPIRATION_KEY, stamp.as_str())])?;
        Ok(expiry)
    }

    pub fn clear_session(&self) -> Result<(), ClientError> {
        self.store.remove_all(&[TOKEN_KEY, EXPIRATION_KEY])
    }

    /// Snapshot for passing to [`ApiClient`](crate::ApiClient) calls
    pub fn context(&self) -> SessionContext {
        SessionContext::new(self.get_token())
    }
}
