//! Durable key/value storage for client session state.
//!
//! Plays the role of browser `localStorage`: string keys and values that
//! survive restarts. Writes and removals take several keys at once so that
//! related keys always change together.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::warn;

use crate::error::ClientError;

/// Key holding the raw token string
pub const TOKEN_KEY: &str = "token";

/// Key holding the RFC 3339 expiry timestamp
pub const EXPIRATION_KEY: &str = "expiration";

/// Session file name under the data directory
const SESSION_FILE: &str = "session.json";

pub trait DurableStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Write every entry in one step
    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), ClientError>;

    /// Remove every key in one step
    fn remove_all(&self, keys: &[&str]) -> Result<(), ClientError>;
}

/// In-process store; contents vanish with the value
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), ClientError> {
        let mut map = self.entries.lock();
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), ClientError> {
        let mut map = self.entries.lock();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

/// JSON-file store. The whole map is rewritten through a temp file on every
/// change.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or start) a store at `path`. An unreadable file starts empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ClientError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "discarding unreadable session file");
                    BTreeMap::new()
                },
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// `<data dir>/eventhub/session.json`, if the platform has a data dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("eventhub").join(SESSION_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl DurableStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), ClientError> {
        let mut map = self.entries.lock();
        let mut next = map.clone();
        for (key, value) in entries {
            next.insert((*key).to_string(), (*value).to_string());
        }
        self.persist(&next)?;
        *map = next;
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), ClientError> {
        let mut map = self.entries.lock();
        let mut next = map.clone();
        for key in keys {
            next.remove(*key);
        }
        self.persist(&next)?;
        *map = next;
        Ok(())
    }
}
