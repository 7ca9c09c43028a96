//! Integration tests driving gated pages through an axum router.

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use cookie::{Cookie, CookieJar, Key};
use pagegate_auth::{
    config::CookieConfig, mocks::MockCredentialVerifier, GateDefaults, PageGateOptions,
    PageResult, Session, WhenAuthed, WhenUnauthed,
};
use pagegate_web::{
    serve_page, serve_page_with, AppError, CorrelationId, GateState, PageRequest, PageResponse,
};
use serde_json::{json, Value};
use tower::ServiceExt;

type TestState = GateState<MockCredentialVerifier>;

const KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
const TOKENS: &str = r#"{"idToken":"tok","refreshToken":"ref"}"#;

async fn dashboard(
    State(state): State<TestState>,
    correlation_id: CorrelationId,
    PageRequest(ctx): PageRequest,
) -> Result<PageResponse, AppError> {
    let options = PageGateOptions::new()
        .when_unauthed(WhenUnauthed::RedirectToLogin)
        .with_auth_page_url("/login");
    serve_page_with(&state, &options, correlation_id, ctx, |ctx| async move {
        let uid = ctx.session().and_then(|s| s.id.clone());
        Ok(Some(PageResult::props(json!({ "uid": uid }))))
    })
    .await
}

async fn login(
    State(state): State<TestState>,
    correlation_id: CorrelationId,
    PageRequest(ctx): PageRequest,
) -> Result<PageResponse, AppError> {
    let options = PageGateOptions::new()
        .when_authed(WhenAuthed::RedirectToApp)
        .with_app_page_url("/dashboard");
    serve_page(&state, &options, correlation_id, ctx).await
}

async fn failing(
    State(state): State<TestState>,
    correlation_id: CorrelationId,
    PageRequest(ctx): PageRequest,
) -> Result<PageResponse, AppError> {
    serve_page_with(&state, &PageGateOptions::new(), correlation_id, ctx, |_| async {
        Err(anyhow::anyhow!("database unavailable"))
    })
    .await
}

async fn misconfigured(
    State(state): State<TestState>,
    correlation_id: CorrelationId,
    PageRequest(ctx): PageRequest,
) -> Result<PageResponse, AppError> {
    // App URL set but no login URL for an anonymous redirect.
    let options = PageGateOptions::new()
        .when_unauthed(WhenUnauthed::RedirectToLogin)
        .with_app_page_url("/dashboard");
    serve_page(&state, &options, correlation_id, ctx).await
}

async fn account(
    State(state): State<TestState>,
    correlation_id: CorrelationId,
    PageRequest(ctx): PageRequest,
) -> Result<Response, AppError> {
    let page = serve_page(&state, &PageGateOptions::new(), correlation_id, ctx).await?;
    let set_cookie = match page.refreshed_tokens() {
        Some(tokens) => {
            let value = serde_json::to_string(tokens).map_err(|e| AppError::internal("token encoding").with_source(e))?;
            Some(Cookie::new("app.AuthUserTokens", value).encoded().to_string())
        }
        None => None,
    };
    let mut response = page.into_response();
    if let Some(set_cookie) = set_cookie {
        let value = HeaderValue::try_from(set_cookie).map_err(|e| AppError::internal("cookie header").with_source(e))?;
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    Ok(response)
}

fn app(state: TestState) -> Router {
    Router::new()
        .route("/account", get(account))
        .route("/dashboard", get(dashboard))
        .route("/login", get(login))
        .route("/failing", get(failing))
        .route("/misconfigured", get(misconfigured))
        .with_state(state)
}

fn verifier() -> MockCredentialVerifier {
    MockCredentialVerifier::new().with_token("tok", Session::identified("uid-1"))
}

fn plain_state() -> TestState {
    GateState::new(GateDefaults::new(CookieConfig::new("app")), verifier()).unwrap()
}

fn signed_state() -> TestState {
    let cookies = CookieConfig::new("app").with_key(KEY).with_signed(true);
    GateState::new(GateDefaults::new(cookies), verifier()).unwrap()
}

fn refreshing_state() -> TestState {
    let verifier = MockCredentialVerifier::new().with_refresh("ref", "fresh", Session::identified("uid-1"));
    GateState::new(GateDefaults::new(CookieConfig::new("app")), verifier).unwrap()
}

fn plain_cookie(value: &str) -> String {
    Cookie::new("app.AuthUserTokens", value.to_string())
        .encoded()
        .to_string()
}

fn signed_cookie(value: &str) -> String {
    let key = Key::try_from(KEY.as_bytes()).unwrap();
    let mut jar = CookieJar::new();
    jar.signed_mut(&key)
        .add(Cookie::new("app.AuthUserTokens", value.to_string()));
    jar.get("app.AuthUserTokens").unwrap().encoded().to_string()
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_anonymous_dashboard_redirects_to_login() {
    let response = app(plain_state())
        .oneshot(get_request("/dashboard", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn test_signed_in_dashboard_renders_props() {
    let cookie = plain_cookie(TOKENS);
    let response = app(plain_state())
        .oneshot(get_request("/dashboard", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["props"]["uid"], "uid-1");

    let serialized = body["props"]["AuthUserSerialized"].as_str().unwrap();
    let session = Session::from_serialized(serialized).unwrap();
    assert_eq!(session.id.as_deref(), Some("uid-1"));
}

#[tokio::test]
async fn test_signed_in_login_redirects_to_app() {
    let cookie = plain_cookie(TOKENS);
    let response = app(plain_state())
        .oneshot(get_request("/login", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/dashboard");
}

#[tokio::test]
async fn test_anonymous_login_renders() {
    let response = app(plain_state())
        .oneshot(get_request("/login", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["props"]["AuthUserSerialized"].is_string());
}

#[tokio::test]
async fn test_signed_cookie_accepted() {
    let cookie = signed_cookie(TOKENS);
    let response = app(signed_state())
        .oneshot(get_request("/dashboard", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["props"]["uid"], "uid-1");
}

#[tokio::test]
async fn test_unsigned_cookie_ignored_when_signing_required() {
    let cookie = plain_cookie(TOKENS);
    let response = app(signed_state())
        .oneshot(get_request("/dashboard", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn test_rejected_token_is_unauthorized() {
    let cookie = plain_cookie(r#"{"idToken":"forged"}"#);
    let response = app(plain_state())
        .oneshot(get_request("/dashboard", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_malformed_token_cookie_is_bad_request() {
    let cookie = plain_cookie("not-json");
    let response = app(plain_state())
        .oneshot(get_request("/dashboard", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_hook_failure_is_server_error() {
    let response = app(plain_state())
        .oneshot(get_request("/failing", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");
    assert!(!body["message"].as_str().unwrap().contains("database"));
}

#[tokio::test]
async fn test_missing_login_url_is_misconfiguration() {
    let response = app(plain_state())
        .oneshot(get_request("/misconfigured", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["code"], "GATE_MISCONFIGURED");
}

#[tokio::test]
async fn test_base_path_prefixes_redirects() {
    let response = app(plain_state().with_base_path("/docs"))
        .oneshot(get_request("/dashboard", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/docs/login");
}

#[tokio::test]
async fn test_correlation_id_does_not_affect_outcome() {
    let request = Request::builder()
        .uri("/login")
        .header("X-Correlation-ID", "0f8fad5b-d9cb-469f-a165-70867728950e")
        .body(Body::empty())
        .unwrap();

    let response = app(plain_state()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refreshed_tokens_are_handed_to_the_handler() {
    let cookie = plain_cookie(r#"{"idToken":"stale","refreshToken":"ref"}"#);
    let response = app(refreshing_state())
        .oneshot(get_request("/account", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    let written = Cookie::parse_encoded(set_cookie).unwrap();
    assert_eq!(written.name(), "app.AuthUserTokens");
    assert!(written.value().contains(r#""idToken":"fresh""#));
}

#[tokio::test]
async fn test_no_refresh_writes_no_cookie() {
    let cookie = plain_cookie(TOKENS);
    let response = app(plain_state())
        .oneshot(get_request("/account", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}
