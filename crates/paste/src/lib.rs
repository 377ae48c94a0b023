//! Signed, time-bounded content storage for DropKey.
//!
//! A paste is an opaque ciphertext, an Ed25519 signature over the raw
//! ciphertext bytes, the owner's public key, and an absolute expiry. The
//! store verifies the signature on every write and hides expired pastes on
//! every read; nothing is ever physically deleted here.
//!
//! Only the ciphertext is signed. Metadata (expiry, id) is outside the
//! signature, so changing it cannot invalidate a valid signature, and the
//! integrity guarantee covers the content alone.

pub mod error;
pub mod store;

pub use error::PasteError;
pub use store::{ContentStore, PasteSubmission};
