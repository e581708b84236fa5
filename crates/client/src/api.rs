//! HTTP client for the `EventHub` API.
//!
//! Authorized calls take a [`SessionContext`] explicitly; nothing here reads
//! ambient session state.

use std::time::Duration;

use chrono::{DateTime, Utc};
use eventhub_common::{
    Credentials, ErrorResponse, Event, EventInput, EventMutationResponse, EventResponse,
    EventsResponse, LoginResponse, MessageResponse, SignupResponse,
};
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::ClientError;
use crate::session::{SessionContext, SessionTracker};

/// Request timeout; long enough for a slow scrypt check on signup
const REQUEST_TIMEOUT_SECS: u64 = 30;

const UNSUPPORTED_MODE_MESSAGE: &str = "Unsupported mode.";

/// Which credential endpoint to call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

impl AuthMode {
    fn path(self) -> &'static str {
        match self {
            AuthMode::Login => "/login",
            AuthMode::Signup => "/signup",
        }
    }

    /// Parse a `?mode=` style value. Missing means login; anything other
    /// than `login` or `signup` is rejected.
    pub fn from_query(value: Option<&str>) -> Result<Self, ClientError> {
        match value {
            None | Some("login") => Ok(AuthMode::Login),
            Some("signup") => Ok(AuthMode::Signup),
            Some(_) => Err(ClientError::Validation {
                message: UNSUPPORTED_MODE_MESSAGE.to_string(),
                errors: Default::default(),
            }),
        }
    }
}

/// Result of an authentication attempt
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    /// Token stored in the tracker with the given expiry
    Authenticated {
        token: String,
        expires_at: DateTime<Utc>,
    },
    /// The server refused the credentials; body is shown to the user as-is
    Rejected { status: u16, body: ErrorResponse },
}

/// Clone is cheap; the inner reqwest client is reference counted.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check_response(response: Response) -> Result<Response, ClientError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::from_status(status, &body))
        }
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    /// Log in or sign up, storing the session on success.
    ///
    /// A 401 or 422 reply is returned as [`AuthOutcome::Rejected`] and leaves
    /// any existing session untouched.
    pub async fn authenticate(
        &self,
        mode: AuthMode,
        credentials: &Credentials,
        tracker: &SessionTracker,
    ) -> Result<AuthOutcome, ClientError> {
        debug!(?mode, email = %credentials.email, "authenticating");
        let response = self
            .client
            .post(self.url(mode.path()))
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::UNPROCESSABLE_ENTITY {
            let text = response.text().await.unwrap_or_default();
            let body = serde_json::from_str(&text).unwrap_or_else(|_| ErrorResponse {
                message: text,
                ..ErrorResponse::default()
            });
            return Ok(AuthOutcome::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let token = match mode {
            AuthMode::Login => Self::parse::<LoginResponse>(response).await?.token,
            AuthMode::Signup => Self::parse::<SignupResponse>(response).await?.token,
        };
        let expires_at = tracker.set_session(&token)?;
        info!(?mode, %expires_at, "session started");

        Ok(AuthOutcome::Authenticated { token, expires_at })
    }

    pub async fn list_events(&self) -> Result<Vec<Event>, ClientError> {
        let response = self.client.get(self.url("/events")).send().await?;
        Ok(Self::parse::<EventsResponse>(response).await?.events)
    }

    pub async fn get_event(&self, id: &str) -> Result<Event, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/events/{id}")))
            .send()
            .await?;
        Ok(Self::parse::<EventResponse>(response).await?.event)
    }

    /// Fails with `NotLoggedIn`/`SessionExpired` before sending if the
    /// session is not valid.
    pub async fn create_event(
        &self,
        session: &SessionContext,
        input: &EventInput,
    ) -> Result<Event, ClientError> {
        let bearer = session.bearer()?;
        let response = self
            .client
            .post(self.url("/events"))
            .header(header::AUTHORIZATION, bearer)
            .json(input)
            .send()
            .await?;
        Ok(Self::parse::<EventMutationResponse>(response).await?.event)
    }

    pub async fn update_event(
        &self,
        session: &SessionContext,
        id: &str,
        input: &EventInput,
    ) -> Result<Event, ClientError> {
        let bearer = session.bearer()?;
        let response = self
            .client
            .patch(self.url(&format!("/events/{id}")))
            .header(header::AUTHORIZATION, bearer)
            .json(input)
            .send()
            .await?;
        Ok(Self::parse::<EventMutationResponse>(response).await?.event)
    }

    /// Returns the server's confirmation message
    pub async fn delete_event(
        &self,
        session: &SessionContext,
        id: &str,
    ) -> Result<String, ClientError> {
        let bearer = session.bearer()?;
        let response = self
            .client
            .delete(self.url(&format!("/events/{id}")))
            .header(header::AUTHORIZATION, bearer)
            .send()
            .await?;
        Ok(Self::parse::<MessageResponse>(response).await?.message)
    }
}
