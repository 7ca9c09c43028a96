//! Page runner.
//!
//! Runs the gate for one request inside a `page_gate` span and maps the
//! outcome to an HTTP response. A refreshed token pair rides along on the
//! returned [`PageResponse`] for the handler to persist.

use crate::error::AppError;
use crate::extractors::CorrelationId;
use crate::response::PageResponse;
use crate::state::GateState;
use pagegate_auth::providers::CredentialVerifier;
use pagegate_auth::{GateOutput, PageGateOptions, PageResult, RequestContext};
use std::future::Future;
use tracing::Instrument;

fn respond<V>(state: &GateState<V>, output: GateOutput) -> PageResponse {
    let response = PageResponse::from(output);
    match state.base_path() {
        Some(base_path) => response.with_base_path(base_path),
        None => response,
    }
}

/// Gate a page that has no data-fetching step.
///
/// # Errors
///
/// Returns error if session resolution fails or the redirect configuration
/// is invalid.
pub async fn serve_page<V: CredentialVerifier>(
    state: &GateState<V>,
    options: &PageGateOptions,
    correlation_id: CorrelationId,
    ctx: RequestContext,
) -> Result<PageResponse, AppError> {
    let span = tracing::info_span!(
        "page_gate",
        correlation_id = %correlation_id.0,
        path = ctx.path(),
    );

    let output = state.gate().run(options, ctx).instrument(span).await?;
    Ok(respond(state, output))
}

/// Gate a page and run `hook` to load its data when no redirect applies.
///
/// # Errors
///
/// Returns error if session resolution fails, the redirect configuration is
/// invalid, or the hook fails.
pub async fn serve_page_with<V, F, Fut>(
    state: &GateState<V>,
    options: &PageGateOptions,
    correlation_id: CorrelationId,
    ctx: RequestContext,
    hook: F,
) -> Result<PageResponse, AppError>
where
    V: CredentialVerifier,
    F: FnOnce(RequestContext) -> Fut + Send,
    Fut: Future<Output = anyhow::Result<Option<PageResult>>> + Send,
{
    let span = tracing::info_span!(
        "page_gate",
        correlation_id = %correlation_id.0,
        path = ctx.path(),
    );

    let output = state
        .gate()
        .run_with(options, ctx, hook)
        .instrument(span)
        .await?;
    Ok(respond(state, output))
}
