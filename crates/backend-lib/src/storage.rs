// ============================
// eventhub-backend-lib/src/storage.rs
// ============================
//! Storage abstraction with flat-file implementation.
//!
//! Events and users live in one JSON document:
//! `{"events": [...], "users": [...]}`. Every read-modify-write cycle
//! holds a single writer lock, and writes land through a temp file that is
//! renamed over the original, so readers never see a partial document.
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use eventhub_common::{Event, EventInput, FieldErrors, UserSummary};
use serde::{Deserialize, Serialize};
use tokio::{fs as tokio_fs, sync::Mutex};
use tracing::debug;

use crate::error::AppError;
use crate::validation::{EMAIL_EXISTS_MESSAGE, SIGNUP_FAILED_MESSAGE};

/// A stored user account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    /// scrypt PHC string; never the plaintext
    #[serde(rename = "password")]
    pub password_hash: String,
}

impl UserRecord {
    /// The part of the record that may leave the server
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            email: self.email.clone(),
        }
    }
}

/// On-disk document. Unknown top-level keys survive a rewrite.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    events: Option<Vec<Event>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    users: Option<Vec<UserRecord>>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

fn no_events() -> AppError {
    AppError::NotFound("Could not find any events.".to_string())
}

fn no_event_for(id: &str) -> AppError {
    AppError::NotFound(format!("Could not find event for id {id}"))
}

/// Trait for storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    /// All events, newest first
    async fn list_events(&self) -> Result<Vec<Event>, AppError>;

    /// A single event by id
    async fn get_event(&self, id: &str) -> Result<Event, AppError>;

    /// Store a new event under a fresh id
    async fn insert_event(&self, input: EventInput) -> Result<Event, AppError>;

    /// Overwrite every field of an existing event, keeping its id
    async fn replace_event(&self, id: &str, input: EventInput) -> Result<Event, AppError>;

    /// Remove an event; `NotFound` if the id is absent
    async fn delete_event(&self, id: &str) -> Result<(), AppError>;

    /// Exact, case-sensitive email lookup
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;

    /// Store a new user; rejects an email that is already registered
    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<UserRecord, AppError>;
}

/// Flat-file implementation of the Storage trait
#[derive(Clone)]
pub struct FlatFileStorage {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FlatFileStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Document, AppError> {
        if !tokio_fs::try_exists(&self.path).await? {
            return Ok(Document::default());
        }
        let content = tokio_fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(Document::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_document(&self, document: &Document) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), "document written");
        Ok(())
    }
}

#[async_trait]
impl Storage for FlatFileStorage {
    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        self.read_document().await?.events.ok_or_else(no_events)
    }

    async fn get_event(&self, id: &str) -> Result<Event, AppError> {
        let events = match self.read_document().await?.events {
            Some(events) if !events.is_empty() => events,
            _ => return Err(no_events()),
        };
        events
            .into_iter()
            .find(|ev| ev.id == id)
            .ok_or_else(|| no_event_for(id))
    }

    async fn insert_event(&self, input: EventInput) -> Result<Event, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;

        let event = input.into_event(uuid::Uuid::new_v4().to_string());
        document
            .events
            .get_or_insert_with(Vec::new)
            .insert(0, event.clone());

        self.write_document(&document).await?;
        Ok(event)
    }

    async fn replace_event(&self, id: &str, input: EventInput) -> Result<Event, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;

        let events = match document.events.as_mut() {
            Some(events) if !events.is_empty() => events,
            _ => return Err(no_events()),
        };
        let slot = events
            .iter_mut()
            .find(|ev| ev.id == id)
            .ok_or_else(|| no_event_for(id))?;
        *slot = input.into_event(id.to_string());
        let event = slot.clone();

        self.write_document(&document).await?;
        Ok(event)
    }

    async fn delete_event(&self, id: &str) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;

        let events = document.events.as_mut().ok_or_else(|| no_event_for(id))?;
        let before = events.len();
        events.retain(|ev| ev.id != id);
        if events.len() == before {
            return Err(no_event_for(id));
        }

        self.write_document(&document).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let document = self.read_document().await?;
        Ok(document
            .users
            .unwrap_or_default()
            .into_iter()
            .find(|user| user.email == email))
    }

    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<UserRecord, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;

        let users = document.users.get_or_insert_with(Vec::new);
        if users.iter().any(|user| user.email == email) {
            let mut errors = FieldErrors::new();
            errors.insert("email".to_string(), EMAIL_EXISTS_MESSAGE.to_string());
            return Err(AppError::validation(SIGNUP_FAILED_MESSAGE, errors));
        }

        let user = UserRecord {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.push(user.clone());

        self.write_document(&document).await?;
        Ok(user)
    }
}
