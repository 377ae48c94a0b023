//! Cross-crate integration tests for DropKey
//!
//! This test suite validates:
//! - Signed paste round trips through registry, validator and store
//! - Expiry under a simulated clock
//! - Challenge–response authentication against registered keys
//! - File-backed persistence and concurrent access to one store

pub mod test_utils;

#[cfg(test)]
mod paste_properties;

#[cfg(test)]
mod auth_properties;

#[cfg(test)]
mod persistence;
