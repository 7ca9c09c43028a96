//! Redirect policy engine.
//!
//! Two rule sets can ask for a redirect:
//!
//! - **Declarative**: a [`RedirectConfig`] mapping each authentication state
//!   to an optional [`Redirect`].
//! - **Legacy**: the [`WhenAuthed`]/[`WhenUnauthed`] actions plus the app and
//!   auth page URLs.
//!
//! ```text
//! redirect_config present? ──yes──▶ rule for auth state (may be unset)
//!          │ no
//!          ▼
//! any legacy URL usable? ──no──▶ Proceed
//!          │ yes
//!          ▼
//! anonymous + RedirectToLogin ──▶ redirect to auth page
//! authenticated + RedirectToApp ──▶ redirect to app page
//! otherwise ──▶ Proceed
//! ```
//!
//! A present declarative map supersedes the legacy rules entirely; the two are
//! never merged, and legacy URL functions are not called.

use crate::config::{MergedOptions, PageUrl, RedirectConfig, WhenAuthed, WhenUnauthed};
use crate::context::RequestContext;
use crate::error::{GateError, Result};
use crate::outcome::Redirect;
use crate::state::Session;
use tracing::{debug, warn};

/// Engine verdict for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    /// No rule asked for a redirect.
    Proceed,

    /// Redirect instead of rendering.
    Redirect(Redirect),

    /// A declarative map is present but holds no rule for this auth state.
    ///
    /// Means the same as [`Proceed`](Self::Proceed) to callers; kept distinct
    /// so the declarative path stays observable.
    DeclarativeUnset,
}

impl RedirectDecision {
    /// The redirect, if one was decided.
    #[must_use]
    pub const fn redirect(&self) -> Option<&Redirect> {
        match self {
            Self::Redirect(redirect) => Some(redirect),
            Self::Proceed | Self::DeclarativeUnset => None,
        }
    }

    /// Consume the decision, yielding the redirect if one was decided.
    #[must_use]
    pub fn into_redirect(self) -> Option<Redirect> {
        match self {
            Self::Redirect(redirect) => Some(redirect),
            Self::Proceed | Self::DeclarativeUnset => None,
        }
    }
}

/// Option names used in configuration errors.
const AUTH_PAGE_URL: &str = "auth_page_url";
const APP_PAGE_URL: &str = "app_page_url";

/// Decide whether this request should redirect.
///
/// # Errors
///
/// Returns a configuration error if a legacy redirect action is selected and
/// its URL is missing or resolves to an empty destination.
pub fn decide(
    options: &MergedOptions,
    session: &Session,
    ctx: &RequestContext,
) -> Result<RedirectDecision> {
    if let Some(config) = &options.redirect_config {
        return Ok(declarative(config, session));
    }

    match LegacyPlan::new(options) {
        Some(plan) => plan.apply(session, ctx),
        None => {
            debug!("No declarative map and no legacy URLs, proceeding");
            Ok(RedirectDecision::Proceed)
        }
    }
}

fn declarative(config: &RedirectConfig, session: &Session) -> RedirectDecision {
    let status = session.status();
    match config.rule_for(status) {
        Some(rule) => {
            debug!(?status, destination = %rule.destination, "Declarative redirect");
            RedirectDecision::Redirect(rule.clone())
        }
        None => {
            debug!(?status, "Declarative map has no rule for this auth state");
            RedirectDecision::DeclarativeUnset
        }
    }
}

/// Legacy rules, built only when at least one legacy URL is usable.
struct LegacyPlan<'a> {
    when_authed: WhenAuthed,
    when_unauthed: WhenUnauthed,
    auth_page_url: Option<&'a PageUrl>,
    app_page_url: Option<&'a PageUrl>,
}

impl<'a> LegacyPlan<'a> {
    fn new(options: &'a MergedOptions) -> Option<Self> {
        let auth_page_url = options.auth_page_url.as_ref().filter(|url| url.is_usable());
        let app_page_url = options.app_page_url.as_ref().filter(|url| url.is_usable());
        if auth_page_url.is_none() && app_page_url.is_none() {
            return None;
        }
        Some(Self {
            when_authed: options.when_authed,
            when_unauthed: options.when_unauthed,
            auth_page_url,
            app_page_url,
        })
    }

    fn apply(self, session: &Session, ctx: &RequestContext) -> Result<RedirectDecision> {
        let authenticated = session.is_authenticated();

        if !authenticated && self.when_unauthed == WhenUnauthed::RedirectToLogin {
            return required_redirect(self.auth_page_url, AUTH_PAGE_URL, session, ctx)
                .map(RedirectDecision::Redirect);
        }
        if authenticated && self.when_authed == WhenAuthed::RedirectToApp {
            return required_redirect(self.app_page_url, APP_PAGE_URL, session, ctx)
                .map(RedirectDecision::Redirect);
        }

        debug!(authenticated, "Legacy rules render the page");
        Ok(RedirectDecision::Proceed)
    }
}

fn required_redirect(
    url: Option<&PageUrl>,
    option: &'static str,
    session: &Session,
    ctx: &RequestContext,
) -> Result<Redirect> {
    let Some(url) = url else {
        warn!(option, "Redirect selected but URL is not configured");
        return Err(GateError::MissingRedirectUrl { option });
    };

    let destination = url.resolve(ctx, session);
    if destination.path.is_empty() {
        warn!(option, "Redirect URL resolved to an empty destination");
        return Err(GateError::EmptyRedirectDestination { option });
    }

    debug!(option, destination = %destination.path, "Legacy redirect");
    Ok(Redirect {
        destination: destination.path,
        permanent: false,
        base_path: destination.base_path,
    })
}
