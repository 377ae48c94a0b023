//! Configuration management for DropKey.
//!
//! Read once at process start (file, then environment overrides) and handed
//! to component constructors. Components never read the environment.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default maximum paste lifetime: 7 days.
pub const DEFAULT_MAX_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Default bearer credential lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Upper bound for the bearer credential lifetime: 30 days.
pub const MAX_TOKEN_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub paste: PasteConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Prefix for share URLs: `{base_url}/paste/{id}#{public_key}`
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasteConfig {
    pub max_ttl_seconds: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Hex-encoded 32-byte key for bearer credential MACs
    pub token_secret: String,
    pub token_ttl_seconds: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            base_url: "https://yourpastebin.com".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("dropkey.db"),
        }
    }
}

impl Default for PasteConfig {
    fn default() -> Self {
        Self {
            max_ttl_seconds: DEFAULT_MAX_TTL_SECONDS,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: String::new(),
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            paste: PasteConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Apply `DROPKEY_*` environment overrides.
    pub fn apply_env(self) -> anyhow::Result<Self> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_vars<F>(mut self, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DROPKEY_BIND_ADDR") {
            self.server.bind_addr = v;
        }
        if let Some(v) = lookup("DROPKEY_BASE_URL") {
            self.server.base_url = v;
        }
        if let Some(v) = lookup("DROPKEY_DATABASE_PATH") {
            self.storage.database_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("DROPKEY_TOKEN_SECRET") {
            self.auth.token_secret = v;
        }
        if let Some(v) = lookup("DROPKEY_TOKEN_TTL_SECONDS") {
            self.auth.token_ttl_seconds = v
                .parse()
                .with_context(|| format!("DROPKEY_TOKEN_TTL_SECONDS is not an integer: {v}"))?;
        }
        if let Some(v) = lookup("DROPKEY_LOG_JSON") {
            self.logging.json = matches!(v.as_str(), "1" | "true" | "yes");
        }
        Ok(self)
    }

    /// Reject values no component can run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=DEFAULT_MAX_TTL_SECONDS).contains(&self.paste.max_ttl_seconds) {
            anyhow::bail!(
                "paste.max_ttl_seconds must be between 1 and {DEFAULT_MAX_TTL_SECONDS}"
            );
        }
        if !(1..=MAX_TOKEN_TTL_SECONDS).contains(&self.auth.token_ttl_seconds) {
            anyhow::bail!("auth.token_ttl_seconds must be between 1 and {MAX_TOKEN_TTL_SECONDS}");
        }
        if self.server.base_url.ends_with('/') {
            anyhow::bail!("server.base_url must not end with '/'");
        }
        Ok(())
    }
}
