// ============================
// eventhub-backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Prefix for environment overrides, e.g. `EVENTHUB_BIND_ADDR`
pub const ENV_PREFIX: &str = "EVENTHUB_";

/// Default scrypt work factor (`log2(N)`)
pub const DEFAULT_PASSWORD_HASH_LOG_N: u8 = 15;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// JSON document holding the `events` and `users` collections
    pub data_file: PathBuf,
    /// Directory served under `/pictures`
    pub pictures_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// HMAC secret used to sign tokens. Changing it invalidates every issued token.
    pub jwt_secret: String,
    /// scrypt `log2(N)` work factor applied at signup
    pub password_hash_log_n: u8,
    /// Value of `Access-Control-Allow-Origin`
    pub cors_allow_origin: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            data_file: PathBuf::from("events.json"),
            pictures_dir: PathBuf::from("pictures"),
            log_level: "info".to_string(),
            jwt_secret: String::new(),
            password_hash_log_n: DEFAULT_PASSWORD_HASH_LOG_N,
            cors_allow_origin: "*".to_string(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("bind_addr", &self.bind_addr)
            .field("data_file", &self.data_file)
            .field("pictures_dir", &self.pictures_dir)
            .field("log_level", &self.log_level)
            .field("jwt_secret", &"<redacted>")
            .field("password_hash_log_n", &self.password_hash_log_n)
            .field("cors_allow_origin", &self.cors_allow_origin)
            .finish()
    }
}

impl Settings {
    /// Load settings from a TOML file and the environment, then validate them.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Self::figment(path).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Provider chain: defaults, then the file, then `EVENTHUB_*`, then `JWT_SECRET`
    pub fn figment<P: AsRef<Path>>(path: P) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Env::raw().only(&["JWT_SECRET"]))
    }

    /// Check invariants that the type system can't
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            bail!("jwt_secret must be set (config file, EVENTHUB_JWT_SECRET or JWT_SECRET)");
        }
        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            bail!("unknown log_level '{}'", self.log_level);
        }
        if !(8..=20).contains(&self.password_hash_log_n) {
            bail!("password_hash_log_n must be between 8 and 20");
        }
        if self.cors_allow_origin.trim().is_empty() {
            bail!("cors_allow_origin must not be empty");
        }
        Ok(())
    }
}
