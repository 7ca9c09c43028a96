//! HTTP error mapping for gate failures.
//!
//! [`GateError`] is framework-agnostic; this module turns it into a status
//! code and a JSON body. Configuration and hook failures become 500s and are
//! logged with their source; rejected credentials become 401s.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pagegate_auth::GateError;
use serde::Serialize;
use std::fmt;

/// Error returned by gated page handlers.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    /// User-facing message.
    message: String,
    /// Stable code for clients.
    code: &'static str,
    /// Logged, never sent to the client.
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create an error with an explicit status and code.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Attach the underlying error for logging.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// 400 Bad Request.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    /// 401 Unauthorized.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    /// 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR", message)
    }

    /// HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Client-facing error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<GateError> for AppError {
    fn from(err: GateError) -> Self {
        if err.is_verification_error() {
            return Self::unauthorized(err.to_string());
        }
        match err {
            GateError::MalformedCredential { .. } | GateError::SessionEncoding(_) => {
                Self::bad_request("Malformed session credential").with_source(err)
            }
            GateError::MissingRedirectUrl { .. }
            | GateError::EmptyRedirectDestination { .. }
            | GateError::InvalidConfig { .. } => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "GATE_MISCONFIGURED", "Page gate is misconfigured")
                    .with_source(err)
            }
            GateError::Hook(source) => Self::internal("Page data could not be loaded").with_source(source),
            other => Self::internal("An internal error occurred").with_source(other),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    error = %source,
                    "Page request failed"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    "Page request failed"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_configuration_error_is_server_error() {
        let err = AppError::from(GateError::MissingRedirectUrl {
            option: "auth_page_url",
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "GATE_MISCONFIGURED");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_verification_error_is_unauthorized() {
        let err = AppError::from(GateError::TokenExpired);
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let err = AppError::from(GateError::InvalidToken {
            reason: "bad signature".into(),
        });
        assert_eq!(err.code(), "UNAUTHORIZED");
    }

    #[test]
    fn test_malformed_credential_is_bad_request() {
        let err = AppError::from(GateError::MalformedCredential {
            reason: "eof".into(),
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_hook_error_keeps_source() {
        let err = AppError::from(GateError::Hook(anyhow::anyhow!("db down")));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("db down"));
    }
}
