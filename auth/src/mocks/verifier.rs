//! Mock credential verifier for testing.

use crate::error::{GateError, Result};
use crate::providers::{CredentialVerifier, Verified};
use crate::state::{Session, TokenPair};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock credential verifier.
///
/// Known id tokens verify to their preset session. Unknown id tokens are
/// refreshed when the refresh token was registered with
/// [`with_refresh`](Self::with_refresh), and rejected otherwise.
#[derive(Debug, Clone, Default)]
pub struct MockCredentialVerifier {
    tokens: HashMap<String, Session>,
    refreshes: HashMap<String, (String, Session)>,
    calls: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl MockCredentialVerifier {
    /// Create a verifier that rejects every token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `id_token` as `session`.
    #[must_use]
    pub fn with_token(mut self, id_token: impl Into<String>, session: Session) -> Self {
        self.tokens.insert(id_token.into(), session);
        self
    }

    /// Accept `refresh_token`, issuing `new_id_token` for `session`.
    #[must_use]
    pub fn with_refresh(
        mut self,
        refresh_token: impl Into<String>,
        new_id_token: impl Into<String>,
        session: Session,
    ) -> Self {
        self.refreshes
            .insert(refresh_token.into(), (new_id_token.into(), session));
        self
    }

    /// Number of verify calls so far (for testing).
    ///
    /// # Errors
    ///
    /// Returns error if lock is poisoned.
    pub fn call_count(&self) -> Result<usize> {
        Ok(self
            .calls
            .lock()
            .map_err(|_| GateError::Internal("Mutex lock failed".to_string()))?
            .len())
    }

    /// Arguments of every verify call so far (for testing).
    ///
    /// # Errors
    ///
    /// Returns error if lock is poisoned.
    pub fn calls(&self) -> Result<Vec<(String, Option<String>)>> {
        Ok(self
            .calls
            .lock()
            .map_err(|_| GateError::Internal("Mutex lock failed".to_string()))?
            .clone())
    }
}

impl CredentialVerifier for MockCredentialVerifier {
    fn verify(
        &self,
        id_token: &str,
        refresh_token: Option<&str>,
    ) -> impl Future<Output = Result<Verified>> + Send {
        let calls = Arc::clone(&self.calls);
        let id_token = id_token.to_string();
        let refresh_token = refresh_token.map(ToString::to_string);
        let known = self.tokens.get(&id_token).cloned();
        let refreshed = refresh_token
            .as_ref()
            .and_then(|token| self.refreshes.get(token).cloned());

        async move {
            calls
                .lock()
                .map_err(|_| GateError::Internal("Mutex lock failed".to_string()))?
                .push((id_token.clone(), refresh_token.clone()));

            if let Some(session) = known {
                return Ok(Verified::new(session.with_token(id_token)));
            }

            match (refreshed, refresh_token) {
                (Some((new_id_token, session)), Some(refresh_token)) => Ok(Verified::refreshed(
                    session.with_token(new_id_token.clone()),
                    TokenPair {
                        id_token: new_id_token,
                        refresh_token: Some(refresh_token),
                    },
                )),
                (None, Some(_)) => Err(GateError::TokenExpired),
                _ => Err(GateError::InvalidToken {
                    reason: "unknown id token".to_string(),
                }),
            }
        }
    }
}
