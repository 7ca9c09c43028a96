//! Collaborator interfaces.
//!
//! The gate never talks to cookies or identity providers directly. It reads
//! credential material through a [`CredentialStore`] and turns bearer tokens
//! into sessions through a [`CredentialVerifier`]. Concrete implementations
//! live with the host (see the `pagegate-web` crate for a cookie store) and
//! in-memory versions live in [`crate::mocks`].

pub mod credential_store;
pub mod verifier;

pub use credential_store::CredentialStore;
pub use verifier::{CredentialVerifier, Verified};
