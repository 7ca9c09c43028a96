//! Session state types.
//!
//! A [`Session`] is resolved once per request and is immutable afterwards.
//! Its JSON form doubles as the page prop payload and as the cookie-mode
//! credential, so encoding must round-trip.

use crate::error::{GateError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Authentication state of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthStatus {
    /// No identifier present.
    Anonymous,
    /// A non-empty identifier is present.
    Authenticated,
}

/// The identity behind the current request.
///
/// # Examples
///
/// ```
/// # use pagegate_auth::Session;
/// let anon = Session::anonymous();
/// assert!(!anon.is_authenticated());
///
/// let user = Session::identified("user-1").with_email("a@example.com");
/// assert!(user.is_authenticated());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    /// User identifier. `None` or empty for anonymous sessions.
    pub id: Option<String>,

    /// Email address, if known.
    pub email: Option<String>,

    /// Whether the email address has been verified.
    pub email_verified: bool,

    /// Custom claims carried by the verified token.
    pub claims: Map<String, Value>,

    /// The verified bearer token, when resolved in token mode.
    pub token: Option<String>,
}

impl Session {
    /// Create an anonymous session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Create an identified session.
    #[must_use]
    pub fn identified(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Set the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Mark the email address as verified.
    #[must_use]
    pub const fn with_email_verified(mut self, verified: bool) -> Self {
        self.email_verified = verified;
        self
    }

    /// Add a custom claim.
    #[must_use]
    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.insert(key.into(), value.into());
        self
    }

    /// Attach the bearer token the session was verified from.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Returns `true` when the session carries a non-empty identifier.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Authentication state of this session.
    #[must_use]
    pub fn status(&self) -> AuthStatus {
        if self.is_authenticated() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Anonymous
        }
    }

    /// Encode the session to its serialized string form.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::SessionEncoding`] if a claim cannot be encoded.
    pub fn to_serialized(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| GateError::SessionEncoding(e.to_string()))
    }

    /// Rebuild a session from its serialized form.
    ///
    /// Empty (or whitespace-only) input yields an anonymous session.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::SessionEncoding`] if the input is not a valid
    /// serialized session.
    pub fn from_serialized(serialized: &str) -> Result<Self> {
        if serialized.trim().is_empty() {
            return Ok(Self::anonymous());
        }
        serde_json::from_str(serialized).map_err(|e| GateError::SessionEncoding(e.to_string()))
    }
}

/// Bearer credential pair stored in the token cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Primary identity token.
    pub id_token: String,

    /// Refresh token, if the client holds one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl TokenPair {
    /// Parse the token cookie value.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::MalformedCredential`] if the value is not a token
    /// pair or the identity token is empty.
    pub fn parse(raw: &str) -> Result<Self> {
        let pair: Self = serde_json::from_str(raw).map_err(|e| GateError::MalformedCredential {
            reason: e.to_string(),
        })?;
        if pair.id_token.is_empty() {
            return Err(GateError::MalformedCredential {
                reason: "empty id token".to_string(),
            });
        }
        Ok(pair)
    }
}
