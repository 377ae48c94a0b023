use std::sync::Arc;

use anyhow::Context;
use dropkey_core::{Clock, Config, SqliteStore, SystemClock};
use dropkey_identity::{Authenticator, IdentityRegistry};
use dropkey_paste::ContentStore;

use crate::credential::CredentialIssuer;

/// Shared handler state. Cloning is cheap; every component is reference
/// counted.
#[derive(Clone)]
pub struct AppState {
    pub registry: IdentityRegistry,
    pub authenticator: Authenticator,
    pub pastes: ContentStore,
    pub credentials: CredentialIssuer,
    pub base_url: Arc<str>,
}

impl AppState {
    /// Open the database named in `config` and wire every component to it.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store = Arc::new(
            SqliteStore::open(&config.storage.database_path).with_context(|| {
                format!(
                    "opening database {}",
                    config.storage.database_path.display()
                )
            })?,
        );
        Self::with_store(config, store, Arc::new(SystemClock))
    }

    /// Wire components over an already opened store and a given clock.
    pub fn with_store(
        config: &Config,
        store: Arc<SqliteStore>,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        config.validate()?;

        let registry = IdentityRegistry::new(store.clone());
        let authenticator = Authenticator::new(registry.clone());
        let pastes = ContentStore::new(
            store,
            registry.clone(),
            clock.clone(),
            config.paste.max_ttl_seconds,
        );
        let credentials = CredentialIssuer::from_hex(
            &config.auth.token_secret,
            config.auth.token_ttl_seconds,
            clock,
        )
        .context("auth.token_secret")?;

        Ok(Self {
            registry,
            authenticator,
            pastes,
            credentials,
            base_url: Arc::from(config.server.base_url.as_str()),
        })
    }

    /// Share link for a paste. The key rides in the fragment so it never
    /// reaches a server log.
    pub fn share_url(&self, id: &str, public_key: &str) -> String {
        format!("{}/paste/{}#{}", self.base_url, id, public_key)
    }
}
