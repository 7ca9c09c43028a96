//! Credential verifier trait.

use crate::error::Result;
use crate::state::{Session, TokenPair};

/// A verified session, plus the refreshed token pair if verification had to
/// refresh an expired token.
#[derive(Debug, Clone, PartialEq)]
pub struct Verified {
    /// The verified session.
    pub session: Session,

    /// New token pair when the primary token was refreshed.
    ///
    /// Persisting it is the host's job; the gate only reports it.
    pub refreshed: Option<TokenPair>,
}

impl Verified {
    /// Verified without a refresh.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self {
            session,
            refreshed: None,
        }
    }

    /// Verified after refreshing the token pair.
    #[must_use]
    pub const fn refreshed(session: Session, tokens: TokenPair) -> Self {
        Self {
            session,
            refreshed: Some(tokens),
        }
    }
}

/// Bearer token verifier.
///
/// This trait abstracts over the identity provider (token signature checks,
/// refresh-token exchange).
///
/// # Implementation Notes
///
/// - Refresh and retry are internal to the verifier; the gate calls it once
/// - The call may suspend on network I/O; the gate applies no timeout
pub trait CredentialVerifier: Send + Sync {
    /// Verify `id_token`, refreshing it with `refresh_token` if needed.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The token is invalid → `GateError::InvalidToken`
    /// - The token expired and cannot be refreshed → `GateError::TokenExpired`
    fn verify(
        &self,
        id_token: &str,
        refresh_token: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Verified>> + Send;
}
