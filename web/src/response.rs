//! HTTP rendering of page results.
//!
//! | Result              | Response                                   |
//! |---------------------|--------------------------------------------|
//! | `Redirect`          | 307 (308 if permanent) with `Location`     |
//! | `NotFound`          | 404 `{"notFound": true}`                   |
//! | `Props`             | 200 `{"props": {..}}`                      |

use crate::error::AppError;
use axum::{
    http::{header::LOCATION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use pagegate_auth::{GateOutput, PageResult, Redirect, TokenPair};

/// A gated page's result, ready to send.
///
/// Carries the verifier's refreshed token pair, if any, so the handler can
/// write it back before responding; rendering never writes it.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    result: PageResult,
    base_path: Option<String>,
    refreshed_tokens: Option<TokenPair>,
}

impl PageResponse {
    /// Wrap a page result.
    #[must_use]
    pub const fn new(result: PageResult) -> Self {
        Self {
            result,
            base_path: None,
            refreshed_tokens: None,
        }
    }

    /// Prefix relative redirect destinations with the host's base path.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        let base_path = base_path.into();
        self.base_path = (!base_path.is_empty()).then_some(base_path);
        self
    }

    /// Attach the refreshed token pair reported by the gate.
    #[must_use]
    pub fn with_refreshed_tokens(mut self, tokens: Option<TokenPair>) -> Self {
        self.refreshed_tokens = tokens;
        self
    }

    /// Token pair the verifier issued while resolving this request.
    #[must_use]
    pub const fn refreshed_tokens(&self) -> Option<&TokenPair> {
        self.refreshed_tokens.as_ref()
    }

    /// The underlying result.
    #[must_use]
    pub const fn result(&self) -> &PageResult {
        &self.result
    }

    /// Unwrap into the underlying result.
    #[must_use]
    pub fn into_result(self) -> PageResult {
        self.result
    }
}

impl From<GateOutput> for PageResponse {
    fn from(output: GateOutput) -> Self {
        Self::new(output.result).with_refreshed_tokens(output.refreshed_tokens)
    }
}

impl From<PageResult> for PageResponse {
    fn from(result: PageResult) -> Self {
        Self::new(result)
    }
}

/// Where the client should be sent for `redirect`.
///
/// Absolute URLs and redirects flagged `basePath: false` are left alone.
#[must_use]
pub fn location(redirect: &Redirect, base_path: Option<&str>) -> String {
    match base_path {
        Some(prefix) if redirect.base_path != Some(false) && redirect.destination.starts_with('/') => {
            format!("{}{}", prefix.trim_end_matches('/'), redirect.destination)
        }
        _ => redirect.destination.clone(),
    }
}

impl IntoResponse for PageResponse {
    fn into_response(self) -> Response {
        match self.result {
            PageResult::Redirect(redirect) => {
                let status = if redirect.permanent {
                    StatusCode::PERMANENT_REDIRECT
                } else {
                    StatusCode::TEMPORARY_REDIRECT
                };
                let target = location(&redirect, self.base_path.as_deref());
                match HeaderValue::try_from(target.as_str()) {
                    Ok(value) => (status, [(LOCATION, value)]).into_response(),
                    Err(e) => AppError::internal("Redirect destination is not a valid header")
                        .with_source(e)
                        .into_response(),
                }
            }
            PageResult::NotFound => (StatusCode::NOT_FOUND, Json(PageResult::NotFound)).into_response(),
            props @ PageResult::Props(_) => (StatusCode::OK, Json(props)).into_response(),
        }
    }
}
