//! Request context handed through the gate.

use crate::state::{Session, TokenPair};
use http::{HeaderMap, Method, Uri};

/// Request-scoped view of an inbound page request.
///
/// Credential stores read from the headers, URL functions receive the whole
/// context, and the render hook gets it back with the resolved session
/// attached.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    session: Option<Session>,
    refreshed_tokens: Option<TokenPair>,
}

impl RequestContext {
    /// Create a context from request parts.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        Self {
            method,
            uri,
            headers,
            session: None,
            refreshed_tokens: None,
        }
    }

    /// Request method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Request URI.
    #[must_use]
    pub const fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Request path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Raw query string, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The session attached by the orchestrator, if resolution has run.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Token pair issued by the verifier during resolution, if it refreshed.
    ///
    /// The inbound token cookie is stale when this is set; the host should
    /// write the new pair back.
    #[must_use]
    pub const fn refreshed_tokens(&self) -> Option<&TokenPair> {
        self.refreshed_tokens.as_ref()
    }

    pub(crate) fn attach_session(&mut self, session: Session, refreshed_tokens: Option<TokenPair>) {
        self.session = Some(session);
        self.refreshed_tokens = refreshed_tokens;
    }
}
