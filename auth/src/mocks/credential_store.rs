//! Mock credential store for testing.

use crate::config::CookieReadOptions;
use crate::context::RequestContext;
use crate::error::{GateError, Result};
use crate::providers::CredentialStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock credential store.
///
/// Serves preset values by name regardless of the request, and records
/// every name that was read.
#[derive(Debug, Clone, Default)]
pub struct MockCredentialStore {
    values: HashMap<String, String>,
    reads: Arc<Mutex<Vec<String>>>,
}

impl MockCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset a credential value.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Names read so far, in order (for testing).
    ///
    /// # Errors
    ///
    /// Returns error if lock is poisoned.
    pub fn reads(&self) -> Result<Vec<String>> {
        Ok(self
            .reads
            .lock()
            .map_err(|_| GateError::Internal("Mutex lock failed".to_string()))?
            .clone())
    }
}

impl CredentialStore for MockCredentialStore {
    fn read(
        &self,
        name: &str,
        _ctx: &RequestContext,
        _options: &CookieReadOptions,
    ) -> Result<Option<String>> {
        self.reads
            .lock()
            .map_err(|_| GateError::Internal("Mutex lock failed".to_string()))?
            .push(name.to_string());
        Ok(self.values.get(name).cloned())
    }
}
