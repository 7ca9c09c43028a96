//! Credential store trait.

use crate::config::CookieReadOptions;
use crate::context::RequestContext;
use crate::error::Result;

/// Read access to named, signed and optionally encrypted request credentials.
///
/// # Implementation Notes
///
/// - A value whose signature does not verify under any key reads as absent
/// - Reads must not mutate the request
pub trait CredentialStore: Send + Sync {
    /// Read the credential named `name` from the request.
    ///
    /// # Returns
    ///
    /// The verified (and decrypted, if requested) value, or `None` when the
    /// credential is missing or fails verification.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The read options are unusable (e.g., a malformed key)
    /// - The underlying request data cannot be decoded
    fn read(
        &self,
        name: &str,
        ctx: &RequestContext,
        options: &CookieReadOptions,
    ) -> Result<Option<String>>;
}
