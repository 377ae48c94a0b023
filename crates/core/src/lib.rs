//! Core functionality for the DropKey paste service.
//!
//! This crate provides the types, traits, and utilities shared by every
//! DropKey component: the error taxonomy, the persisted records, the
//! persistence collaborator traits with their SQLite implementation, the
//! clock abstraction, configuration, and logging initialization.

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod storage;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{ErrorKind, StorageError, StorageResult};
pub use storage::{IdentityStore, PasteContent, PasteStore};
#[cfg(feature = "sqlite")]
pub use storage::SqliteStore;
pub use types::{Identity, Paste};
