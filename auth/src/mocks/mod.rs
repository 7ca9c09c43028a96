//! Mock provider implementations for testing.
//!
//! In-memory implementations of the provider traits for unit and
//! integration tests.

pub mod credential_store;
pub mod verifier;

pub use credential_store::MockCredentialStore;
pub use verifier::MockCredentialVerifier;
