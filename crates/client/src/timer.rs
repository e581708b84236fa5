//! Forced logout when the stored session expires.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::session::SessionTracker;

/// Holds at most one pending logout. Arming again, cancelling, or dropping
/// the value aborts the previous one.
#[derive(Default)]
pub struct AutoLogout {
    handle: Option<JoinHandle<()>>,
}

impl AutoLogout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a logout for when the current session expires.
    ///
    /// Returns `false` and schedules nothing when there is no valid session.
    /// When the timer fires it only ends the session it was armed for; a
    /// session stored since then (new expiry) is left alone.
    /// Must be called from within a tokio runtime.
    pub fn arm<F>(&mut self, tracker: Arc<SessionTracker>, on_logout: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();

        if !tracker.get_token().is_valid() {
            debug!("no active session, auto-logout idle");
            return false;
        }
        let Some(deadline) = tracker.expiration() else {
            return false;
        };
        let remaining = tracker.get_duration();
        if remaining < 0 {
            return false;
        }

        let delay = Duration::from_millis(remaining as u64);
        debug!(delay_ms = remaining, "auto-logout armed");
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // A later login rewrote the expiry; that session is not ours to end
            if tracker.expiration() != Some(deadline) {
                debug!("session replaced since arming, auto-logout skipped");
                return;
            }
            if let Err(err) = tracker.clear_session() {
                warn!(error = %err, "failed to clear session on expiry");
            }
            info!("session expired, logged out");
            on_logout();
        }));
        true
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Clear the session now and drop any pending timer
    pub fn logout(&mut self, tracker: &SessionTracker) -> Result<(), crate::ClientError> {
        self.cancel();
        tracker.clear_session()
    }

    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for AutoLogout {
    fn drop(&mut self) {
        self.cancel();
    }
}
