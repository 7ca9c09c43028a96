//! Session resolution.
//!
//! Turns the inbound credential material into a [`Session`]. Token mode reads
//! the bearer token pair and hands it to the verifier; cookie mode decodes a
//! pre-serialized session. A missing credential yields an anonymous session in
//! both modes. Verifier failures are not downgraded.

use crate::config::CookieConfig;
use crate::context::RequestContext;
use crate::error::Result;
use crate::providers::{CredentialStore, CredentialVerifier, Verified};
use crate::state::{Session, TokenPair};
use tracing::debug;

/// Where the session comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Verify the bearer token pair.
    Token,
    /// Decode a pre-serialized session.
    Cookie,
}

impl ResolveMode {
    /// Mode selected by the `use_token` option.
    #[must_use]
    pub const fn from_use_token(use_token: bool) -> Self {
        if use_token { Self::Token } else { Self::Cookie }
    }
}

/// Outcome of resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSession {
    /// The request's session.
    pub session: Session,

    /// Token pair issued by the verifier if it had to refresh.
    pub refreshed_tokens: Option<TokenPair>,
}

impl ResolvedSession {
    const fn unrefreshed(session: Session) -> Self {
        Self {
            session,
            refreshed_tokens: None,
        }
    }
}

/// Resolves sessions through a credential store and verifier.
#[derive(Debug, Clone)]
pub struct SessionResolver<S, V> {
    store: S,
    verifier: V,
}

impl<S, V> SessionResolver<S, V>
where
    S: CredentialStore,
    V: CredentialVerifier,
{
    /// Create a resolver.
    #[must_use]
    pub const fn new(store: S, verifier: V) -> Self {
        Self { store, verifier }
    }

    /// The credential store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The verifier.
    pub const fn verifier(&self) -> &V {
        &self.verifier
    }

    /// Resolve the session for this request.
    ///
    /// Only reads credentials; never writes them.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The credential store fails
    /// - The token cookie is malformed → `GateError::MalformedCredential`
    /// - The verifier rejects the token (propagated unchanged)
    /// - The serialized session cannot be decoded → `GateError::SessionEncoding`
    pub async fn resolve(
        &self,
        mode: ResolveMode,
        ctx: &RequestContext,
        cookies: &CookieConfig,
    ) -> Result<ResolvedSession> {
        let options = cookies.read_options();
        match mode {
            ResolveMode::Token => {
                let name = cookies.tokens_cookie_name();
                let Some(raw) = self.store.read(&name, ctx, &options)? else {
                    debug!(cookie = %name, "No token credential, resolving anonymous session");
                    return Ok(ResolvedSession::unrefreshed(Session::anonymous()));
                };

                let tokens = TokenPair::parse(&raw)?;
                debug!(
                    cookie = %name,
                    has_refresh_token = tokens.refresh_token.is_some(),
                    "Verifying token credential"
                );
                let Verified { session, refreshed } = self
                    .verifier
                    .verify(&tokens.id_token, tokens.refresh_token.as_deref())
                    .await?;

                if refreshed.is_some() {
                    debug!(user_id = ?session.id, "Verifier refreshed the token pair");
                }
                Ok(ResolvedSession {
                    session,
                    refreshed_tokens: refreshed,
                })
            }
            ResolveMode::Cookie => {
                let name = cookies.session_cookie_name();
                let raw = self.store.read(&name, ctx, &options)?.unwrap_or_default();
                debug!(cookie = %name, present = !raw.is_empty(), "Decoding session credential");
                Session::from_serialized(&raw).map(ResolvedSession::unrefreshed)
            }
        }
    }
}
