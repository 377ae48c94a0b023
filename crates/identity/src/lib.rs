//! Identity management and authentication for DropKey.
//!
//! An identity is nothing more than a registered Ed25519 public key with a
//! generated id. Possession of the matching private key is the only
//! credential: there are no passwords and the server stores no secrets.
//!
//! # Components
//!
//! - **Identity Registry**: registers public keys, resolves identities by id
//!   or key, enforces key uniqueness
//! - **Authenticator**: stateless challenge–response verification producing
//!   a [`VerifiedIdentity`]
//!
//! # Security Model
//!
//! - Challenges are supplied by the caller; this crate neither mints nor
//!   tracks them, so a valid proof can be replayed. Freshness is out of scope.
//! - No attempt counters or lockouts; every call is independently verifiable.

pub mod authenticator;
pub mod error;
pub mod registry;

pub use authenticator::{Authenticator, VerifiedIdentity};
pub use error::{AuthError, RegistryError};
pub use registry::IdentityRegistry;
