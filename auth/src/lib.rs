//! # pagegate
//!
//! Request-time gate for server-rendered pages: before a page's data-fetching
//! step runs, resolve who is making the request and decide whether to redirect
//! instead of rendering.
//!
//! ## Pipeline
//!
//! ```text
//! PageGate ─▶ SessionResolver ─▶ Session ─▶ redirect::decide ─▶ redirect?
//!                                                   │ no
//!                                                   ▼
//!                                   render hook ─▶ merge ─▶ PageResult
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use pagegate_auth::*;
//!
//! let defaults = Arc::new(GateDefaults::from_env()?);
//! let gate = PageGate::new(defaults, store, verifier);
//!
//! let options = PageGateOptions::new()
//!     .when_unauthed(WhenUnauthed::RedirectToLogin)
//!     .with_auth_page_url("/login");
//!
//! match gate.handle(&options, ctx).await? {
//!     PageResult::Redirect(redirect) => { /* send 307 */ }
//!     PageResult::Props(props) => { /* render */ }
//!     PageResult::NotFound => { /* 404 */ }
//! }
//! ```

pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod orchestrator;
pub mod outcome;
pub mod providers;
pub mod redirect;
pub mod resolver;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use config::{GateDefaults, MergedOptions, PageGateOptions, PageUrl, RedirectConfig, WhenAuthed, WhenUnauthed};
pub use context::RequestContext;
pub use error::{GateError, Result};
pub use orchestrator::{GateOutput, PageGate};
pub use outcome::{PageResult, Redirect};
pub use redirect::RedirectDecision;
pub use resolver::{ResolveMode, ResolvedSession, SessionResolver};
pub use state::{AuthStatus, Session, TokenPair};
