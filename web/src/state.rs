//! Shared state for gated page handlers.
//!
//! Holds the process-wide [`PageGate`] wired to the cookie credential store.
//! Applications pick the verifier (their identity provider) and put this in
//! their router state.
//!
//! # Examples
//!
//! ```ignore
//! let defaults = GateDefaults::from_env()?;
//! let state = GateState::new(defaults, FirebaseVerifier::new(project_id))?
//!     .with_base_path("/docs");
//!
//! let app = Router::new()
//!     .route("/dashboard", get(dashboard))
//!     .with_state(state);
//! ```

use crate::cookies::CookieCredentialStore;
use pagegate_auth::providers::CredentialVerifier;
use pagegate_auth::{GateDefaults, PageGate, Result};
use std::sync::Arc;

/// Router state for gated pages.
pub struct GateState<V> {
    gate: Arc<PageGate<CookieCredentialStore, V>>,
    base_path: Option<String>,
}

impl<V> Clone for GateState<V> {
    fn clone(&self) -> Self {
        Self {
            gate: Arc::clone(&self.gate),
            base_path: self.base_path.clone(),
        }
    }
}

impl<V: CredentialVerifier> GateState<V> {
    /// Create gate state from loaded defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidConfig`](pagegate_auth::GateError::InvalidConfig) if the defaults fail
    /// [`GateDefaults::validate`].
    pub fn new(defaults: GateDefaults, verifier: V) -> Result<Self> {
        defaults.validate()?;
        Ok(Self {
            gate: Arc::new(PageGate::new(
                Arc::new(defaults),
                CookieCredentialStore::new(),
                verifier,
            )),
            base_path: None,
        })
    }

    /// The page gate.
    #[must_use]
    pub fn gate(&self) -> &PageGate<CookieCredentialStore, V> {
        &self.gate
    }
}

impl<V> GateState<V> {
    /// Base path the pages are mounted under.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        let base_path = base_path.into();
        self.base_path = (!base_path.is_empty()).then_some(base_path);
        self
    }

    /// Base path, if mounted under one.
    #[must_use]
    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }
}
