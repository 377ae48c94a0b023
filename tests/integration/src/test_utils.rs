//! Test utilities for cross-crate integration tests

use std::path::PathBuf;
use std::sync::{Arc, Once};

use dropkey_core::config::DEFAULT_MAX_TTL_SECONDS;
use dropkey_core::{ManualClock, SqliteStore};
use dropkey_crypto::{encode, encode_public_key, generate_keypair, sign_payload, SigningKey};
use dropkey_identity::{Authenticator, IdentityRegistry};
use dropkey_paste::{ContentStore, PasteSubmission};

static TRACING: Once = Once::new();

/// Route component logs to the test harness output. Safe to call repeatedly.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("debug")
            .try_init();
    });
}

/// SQLite file under the temp dir, removed (with its WAL files) on drop.
pub struct TempDb {
    pub path: PathBuf,
}

impl TempDb {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("dropkey-it-{}.db", uuid::Uuid::new_v4()));
        Self { path }
    }
}

impl Default for TempDb {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

/// Every component wired over one file-backed store and a manual clock.
pub struct Harness {
    pub db: TempDb,
    pub store: Arc<SqliteStore>,
    pub clock: Arc<ManualClock>,
    pub registry: IdentityRegistry,
    pub authenticator: Authenticator,
    pub pastes: ContentStore,
}

impl Harness {
    pub fn new() -> Self {
        init_tracing();
        let db = TempDb::new();
        let store = Arc::new(SqliteStore::open(&db.path).unwrap());
        Self::over(db, store, Arc::new(ManualClock::starting_now()))
    }

    /// Reopen the same database file with fresh components.
    pub fn reopen(self) -> Self {
        let Harness { db, clock, .. } = self;
        let store = Arc::new(SqliteStore::open(&db.path).unwrap());
        Self::over(db, store, clock)
    }

    fn over(db: TempDb, store: Arc<SqliteStore>, clock: Arc<ManualClock>) -> Self {
        let registry = IdentityRegistry::new(store.clone());
        let authenticator = Authenticator::new(registry.clone());
        let pastes = ContentStore::new(
            store.clone(),
            registry.clone(),
            clock.clone(),
            DEFAULT_MAX_TTL_SECONDS,
        );
        Self {
            db,
            store,
            clock,
            registry,
            authenticator,
            pastes,
        }
    }

    /// Generate a key pair and register it.
    pub fn user(&self) -> TestUser {
        let key = generate_keypair();
        let id = self.registry.register(&encode_public_key(&key)).unwrap();
        TestUser { id, key }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// A registered identity together with its private key.
pub struct TestUser {
    pub id: String,
    pub key: SigningKey,
}

impl TestUser {
    pub fn public_key(&self) -> String {
        encode_public_key(&self.key)
    }

    /// Submission for `plaintext`, correctly signed by this user.
    pub fn submission(&self, plaintext: &[u8]) -> PasteSubmission {
        PasteSubmission {
            ciphertext: encode(plaintext),
            signature: sign_payload(&self.key, plaintext),
            public_key: self.public_key(),
        }
    }

    /// Signature over `challenge` plus the encoded challenge.
    pub fn prove(&self, challenge: &[u8]) -> (String, String) {
        (sign_payload(&self.key, challenge), encode(challenge))
    }
}
