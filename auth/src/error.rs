//! Error types for session resolution and redirect policy.

use thiserror::Error;

/// Result type alias for gate operations.
pub type Result<T> = std::result::Result<T, GateError>;

/// Error taxonomy for the page gate.
///
/// Configuration errors abort the request and are never retried. Verification
/// errors come from the [`CredentialVerifier`](crate::providers::CredentialVerifier)
/// and are passed through untouched. Render hook failures are transparent.
#[derive(Debug, Error)]
pub enum GateError {
    // ═══════════════════════════════════════════════════════════
    // Configuration Errors
    // ═══════════════════════════════════════════════════════════

    /// A redirect action was selected but its URL is not configured.
    #[error("redirect requires `{option}` to be configured")]
    MissingRedirectUrl {
        /// Name of the missing option.
        option: &'static str,
    },

    /// The configured URL source resolved to an empty destination.
    #[error("`{option}` resolved to an empty redirect destination")]
    EmptyRedirectDestination {
        /// Name of the misconfigured option.
        option: &'static str,
    },

    /// Gate defaults failed validation.
    #[error("Invalid gate configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Credential Errors
    // ═══════════════════════════════════════════════════════════

    /// The credential value could not be parsed.
    #[error("Malformed credential: {reason}")]
    MalformedCredential {
        /// Parse failure detail.
        reason: String,
    },

    /// The bearer token was rejected by the verifier.
    #[error("Invalid token: {reason}")]
    InvalidToken {
        /// Reason reported by the verifier.
        reason: String,
    },

    /// The bearer token expired and could not be refreshed.
    #[error("Token has expired and could not be refreshed")]
    TokenExpired,

    /// Reading from the credential store failed.
    #[error("Credential store error: {0}")]
    CredentialStore(String),

    /// A session could not be encoded or decoded.
    #[error("Session encoding error: {0}")]
    SessionEncoding(String),

    // ═══════════════════════════════════════════════════════════
    // Pass-through
    // ═══════════════════════════════════════════════════════════

    /// The caller-supplied render hook failed.
    #[error(transparent)]
    Hook(#[from] anyhow::Error),

    /// Internal error (should not be exposed to users).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GateError {
    /// Returns `true` if this error stems from gate configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pagegate_auth::GateError;
    /// let err = GateError::MissingRedirectUrl { option: "auth_page_url" };
    /// assert!(err.is_configuration_error());
    /// assert!(!GateError::TokenExpired.is_configuration_error());
    /// ```
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MissingRedirectUrl { .. }
                | Self::EmptyRedirectDestination { .. }
                | Self::InvalidConfig { .. }
        )
    }

    /// Returns `true` if the request's credential was rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pagegate_auth::GateError;
    /// assert!(GateError::TokenExpired.is_verification_error());
    /// assert!(!GateError::Internal("boom".into()).is_verification_error());
    /// ```
    #[must_use]
    pub const fn is_verification_error(&self) -> bool {
        matches!(self, Self::InvalidToken { .. } | Self::TokenExpired)
    }
}
