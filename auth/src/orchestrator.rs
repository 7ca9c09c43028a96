//! Request orchestration.
//!
//! [`PageGate`] runs the full pipeline for one page request:
//!
//! 1. Resolve the session
//! 2. Serialize it once
//! 3. Ask the redirect engine; a redirect short-circuits
//! 4. Attach the session to the context and run the render hook, if any
//! 5. Merge the hook's result with the serialized session
//!
//! The merge is a fixed precedence contract: a hook's own redirect or
//! not-found wins untouched, props always receive the session, and a missing
//! result still yields session-bearing props.

use crate::config::{GateDefaults, PageGateOptions};
use crate::constants::SESSION_PROP_KEY;
use crate::context::RequestContext;
use crate::error::Result;
use crate::outcome::{PageResult, Redirect};
use crate::providers::{CredentialStore, CredentialVerifier};
use crate::redirect::decide;
use crate::resolver::{ResolveMode, ResolvedSession, SessionResolver};
use crate::state::TokenPair;
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

/// Page request gate.
///
/// # Examples
///
/// ```rust,ignore
/// let gate = PageGate::new(Arc::new(defaults), store, verifier);
///
/// let output = gate
///     .run_with(&options, ctx, |ctx| async move {
///         let uid = ctx.session().and_then(|s| s.id.clone());
///         Ok(Some(PageResult::props(json!({ "uid": uid }))))
///     })
///     .await?;
///
/// if let Some(tokens) = &output.refreshed_tokens {
///     // write the new pair back to the token cookie
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PageGate<S, V> {
    defaults: Arc<GateDefaults>,
    resolver: SessionResolver<S, V>,
}

/// Everything a page request produced.
#[derive(Debug, Clone, PartialEq)]
pub struct GateOutput {
    /// What to send to the client.
    pub result: PageResult,

    /// Token pair issued by the verifier if it had to refresh.
    ///
    /// Set even when the result is a redirect. The gate never writes it.
    pub refreshed_tokens: Option<TokenPair>,
}

/// Outcome of the steps that run before the render hook.
enum Gate {
    Redirect {
        redirect: Redirect,
        refreshed_tokens: Option<TokenPair>,
    },
    Render {
        ctx: RequestContext,
        serialized: String,
    },
}

impl<S, V> PageGate<S, V>
where
    S: CredentialStore,
    V: CredentialVerifier,
{
    /// Create a gate over process defaults and the credential collaborators.
    #[must_use]
    pub const fn new(defaults: Arc<GateDefaults>, store: S, verifier: V) -> Self {
        Self {
            defaults,
            resolver: SessionResolver::new(store, verifier),
        }
    }

    /// Process defaults this gate merges call-site options over.
    #[must_use]
    pub fn defaults(&self) -> &GateDefaults {
        &self.defaults
    }

    /// The session resolver.
    #[must_use]
    pub const fn resolver(&self) -> &SessionResolver<S, V> {
        &self.resolver
    }

    /// Gate a page that has no data-fetching hook.
    ///
    /// Drops any refreshed token pair; hosts that persist refreshed tokens
    /// use [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// Returns error if session resolution fails or the redirect
    /// configuration is invalid.
    pub async fn handle(
        &self,
        options: &PageGateOptions,
        ctx: RequestContext,
    ) -> Result<PageResult> {
        self.run(options, ctx).await.map(|output| output.result)
    }

    /// Gate a page and run `hook` when no redirect applies.
    ///
    /// Drops any refreshed token pair; see [`run_with`](Self::run_with).
    ///
    /// # Errors
    ///
    /// Returns error if session resolution fails, the redirect configuration
    /// is invalid, or the hook fails.
    pub async fn handle_with<F, Fut>(
        &self,
        options: &PageGateOptions,
        ctx: RequestContext,
        hook: F,
    ) -> Result<PageResult>
    where
        F: FnOnce(RequestContext) -> Fut + Send,
        Fut: Future<Output = anyhow::Result<Option<PageResult>>> + Send,
    {
        self.run_with(options, ctx, hook)
            .await
            .map(|output| output.result)
    }

    /// Gate a page that has no data-fetching hook, reporting refreshed tokens.
    ///
    /// # Errors
    ///
    /// Returns error if session resolution fails or the redirect
    /// configuration is invalid.
    pub async fn run(&self, options: &PageGateOptions, ctx: RequestContext) -> Result<GateOutput> {
        match self.gate(options, ctx).await? {
            Gate::Redirect {
                redirect,
                refreshed_tokens,
            } => Ok(GateOutput {
                result: PageResult::Redirect(redirect),
                refreshed_tokens,
            }),
            Gate::Render { ctx, serialized } => Ok(GateOutput {
                result: merge_session(None, serialized),
                refreshed_tokens: ctx.refreshed_tokens().cloned(),
            }),
        }
    }

    /// Gate a page and run `hook` when no redirect applies, reporting
    /// refreshed tokens.
    ///
    /// The hook receives the context with the session (and any refreshed
    /// token pair) attached. Its errors are propagated as
    /// [`GateError::Hook`](crate::GateError::Hook) without altering their
    /// message.
    ///
    /// # Errors
    ///
    /// Returns error if session resolution fails, the redirect configuration
    /// is invalid, or the hook fails.
    pub async fn run_with<F, Fut>(
        &self,
        options: &PageGateOptions,
        ctx: RequestContext,
        hook: F,
    ) -> Result<GateOutput>
    where
        F: FnOnce(RequestContext) -> Fut + Send,
        Fut: Future<Output = anyhow::Result<Option<PageResult>>> + Send,
    {
        match self.gate(options, ctx).await? {
            Gate::Redirect {
                redirect,
                refreshed_tokens,
            } => Ok(GateOutput {
                result: PageResult::Redirect(redirect),
                refreshed_tokens,
            }),
            Gate::Render { ctx, serialized } => {
                let refreshed_tokens = ctx.refreshed_tokens().cloned();
                let result = hook(ctx).await?;
                Ok(GateOutput {
                    result: merge_session(result, serialized),
                    refreshed_tokens,
                })
            }
        }
    }

    async fn gate(&self, options: &PageGateOptions, mut ctx: RequestContext) -> Result<Gate> {
        let merged = options.merge(&self.defaults);

        let ResolvedSession {
            session,
            refreshed_tokens,
        } = self
            .resolver
            .resolve(
                ResolveMode::from_use_token(merged.use_token),
                &ctx,
                &self.defaults.cookies,
            )
            .await?;
        let serialized = session.to_serialized()?;

        if let Some(redirect) = decide(&merged, &session, &ctx)?.into_redirect() {
            info!(
                path = ctx.path(),
                destination = %redirect.destination,
                authenticated = session.is_authenticated(),
                "Redirecting page request"
            );
            return Ok(Gate::Redirect {
                redirect,
                refreshed_tokens,
            });
        }

        debug!(path = ctx.path(), authenticated = session.is_authenticated(), "Rendering page");
        ctx.attach_session(session, refreshed_tokens);
        Ok(Gate::Render { ctx, serialized })
    }
}

/// Merge a render hook's result with the serialized session.
///
/// - `Redirect` / `NotFound` are returned verbatim
/// - `Props` gain the session under [`SESSION_PROP_KEY`]
/// - `None` yields props holding only the session
#[must_use]
pub fn merge_session(result: Option<PageResult>, serialized: String) -> PageResult {
    match result {
        Some(PageResult::Props(mut props)) => {
            props.insert(SESSION_PROP_KEY.to_string(), Value::String(serialized));
            PageResult::Props(props)
        }
        Some(routed @ (PageResult::Redirect(_) | PageResult::NotFound)) => routed,
        None => {
            let mut props = Map::new();
            props.insert(SESSION_PROP_KEY.to_string(), Value::String(serialized));
            PageResult::Props(props)
        }
    }
}
