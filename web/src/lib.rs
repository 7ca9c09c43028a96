//! Axum integration for the page gate.
//!
//! Wires [`pagegate_auth`] into axum handlers: credentials are read from
//! request cookies, the gate runs inside a traced span, and its result is
//! turned into a redirect, a 404, or JSON props.
//!
//! # Request Flow
//!
//! 1. **Extract** the request context (`PageRequest`) and correlation ID
//! 2. **Resolve** the session from the credential cookie
//! 3. **Decide** whether to redirect
//! 4. **Run** the page's data hook with the session attached
//! 5. **Map** the page result (or `AppError`) to an HTTP response
//!
//! # Example
//!
//! ```ignore
//! use pagegate_web::{serve_page_with, AppError, CorrelationId, GateState, PageRequest, PageResponse};
//!
//! async fn dashboard(
//!     State(state): State<GateState<FirebaseVerifier>>,
//!     correlation_id: CorrelationId,
//!     PageRequest(ctx): PageRequest,
//! ) -> Result<PageResponse, AppError> {
//!     let options = PageGateOptions::new().when_unauthed(WhenUnauthed::RedirectToLogin);
//!     serve_page_with(&state, &options, correlation_id, ctx, |ctx| async move {
//!         let uid = ctx.session().and_then(|s| s.id.clone());
//!         Ok(Some(PageResult::props(json!({ "uid": uid }))))
//!     })
//!     .await
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cookies;
pub mod error;
pub mod extractors;
pub mod page;
pub mod response;
pub mod state;

pub use cookies::CookieCredentialStore;
pub use error::AppError;
pub use extractors::{CorrelationId, PageRequest, CORRELATION_ID_HEADER};
pub use page::{serve_page, serve_page_with};
pub use response::PageResponse;
pub use state::GateState;

/// Result type alias for page handlers.
pub type WebResult<T> = Result<T, AppError>;
