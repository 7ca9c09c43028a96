//! Axum extractors for gated pages.
//!
//! - `PageRequest`: the method, URI and headers the gate reads credentials from
//! - `CorrelationId`: request correlation ID for the gate's tracing span
//!
//! # Examples
//!
//! ```ignore
//! async fn dashboard(
//!     State(state): State<GateState<FirebaseVerifier>>,
//!     correlation_id: CorrelationId,
//!     PageRequest(ctx): PageRequest,
//! ) -> Result<PageResponse, AppError> {
//!     serve_page(&state, &options, correlation_id, ctx).await
//! }
//! ```

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use pagegate_auth::RequestContext;
use uuid::Uuid;

/// Header carrying the correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Correlation ID for request tracing.
///
/// Taken from the `X-Correlation-ID` header, or a fresh UUID v4 if the header
/// is missing or not a UUID.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let correlation_id = parts
            .headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}

/// The inbound page request as the gate sees it.
///
/// Never rejects; a request without cookies resolves to an anonymous session.
#[derive(Debug, Clone)]
pub struct PageRequest(pub RequestContext);

#[async_trait]
impl<S> FromRequestParts<S> for PageRequest
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(RequestContext::new(
            parts.method.clone(),
            parts.uri.clone(),
            parts.headers.clone(),
        )))
    }
}
