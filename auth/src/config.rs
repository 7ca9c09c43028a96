//! Gate configuration.
//!
//! Process-wide defaults live in [`GateDefaults`] and are loaded once. Each
//! page passes [`PageGateOptions`]; [`PageGateOptions::merge`] layers them over
//! the defaults into the [`MergedOptions`] snapshot the engine evaluates.

use crate::constants::{cookie_slots, ENV_PREFIX, MIN_COOKIE_KEY_LEN};
use crate::context::RequestContext;
use crate::error::{GateError, Result};
use crate::outcome::Redirect;
use crate::state::{AuthStatus, Session};
use std::fmt;
use std::sync::Arc;

/// What to do when the session is authenticated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WhenAuthed {
    /// Render the page.
    #[default]
    Render,
    /// Redirect to the app page URL.
    RedirectToApp,
}

/// What to do when the session is anonymous.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WhenUnauthed {
    /// Render the page.
    #[default]
    Render,
    /// Redirect to the auth page URL.
    RedirectToLogin,
}

/// A resolved redirect target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Target path or absolute URL.
    pub path: String,
    /// Base path flag forwarded to the redirect.
    pub base_path: Option<bool>,
}

impl Destination {
    /// Destination outside the host's base path.
    #[must_use]
    pub fn outside_base_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            base_path: Some(false),
        }
    }
}

impl From<&str> for Destination {
    fn from(path: &str) -> Self {
        Self {
            path: path.to_string(),
            base_path: None,
        }
    }
}

impl From<String> for Destination {
    fn from(path: String) -> Self {
        Self {
            path,
            base_path: None,
        }
    }
}

type UrlFn = dyn Fn(&RequestContext, &Session) -> Destination + Send + Sync;

/// Source of a legacy redirect URL.
#[derive(Clone)]
pub enum PageUrl {
    /// A fixed destination.
    Fixed(Destination),
    /// Computed per request from the context and session.
    Computed(Arc<UrlFn>),
}

impl PageUrl {
    /// Fixed URL.
    #[must_use]
    pub fn fixed(destination: impl Into<Destination>) -> Self {
        Self::Fixed(destination.into())
    }

    /// URL computed per request.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pagegate_auth::config::PageUrl;
    /// let url = PageUrl::computed(|ctx, _session| format!("/login?next={}", ctx.path()));
    /// assert!(url.is_usable());
    /// ```
    pub fn computed<F, D>(f: F) -> Self
    where
        F: Fn(&RequestContext, &Session) -> D + Send + Sync + 'static,
        D: Into<Destination>,
    {
        Self::Computed(Arc::new(move |ctx: &RequestContext, session: &Session| {
            f(ctx, session).into()
        }))
    }

    /// Whether this source can produce a destination at all.
    ///
    /// A fixed empty string counts as unset.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        match self {
            Self::Fixed(destination) => !destination.path.is_empty(),
            Self::Computed(_) => true,
        }
    }

    /// Produce the destination for this request.
    #[must_use]
    pub fn resolve(&self, ctx: &RequestContext, session: &Session) -> Destination {
        match self {
            Self::Fixed(destination) => destination.clone(),
            Self::Computed(f) => f(ctx, session),
        }
    }
}

impl fmt::Debug for PageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(destination) => f.debug_tuple("Fixed").field(destination).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for PageUrl {
    fn from(path: &str) -> Self {
        Self::fixed(path)
    }
}

/// Declarative redirect map keyed by authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectConfig {
    /// Rule applied to authenticated sessions.
    pub authenticated_user: Option<Redirect>,
    /// Rule applied to anonymous sessions.
    pub unauthenticated_user: Option<Redirect>,
}

impl RedirectConfig {
    /// Empty map. Still authoritative over the legacy rules when present.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            authenticated_user: None,
            unauthenticated_user: None,
        }
    }

    /// Set the rule for authenticated sessions.
    #[must_use]
    pub fn with_authenticated_user(mut self, redirect: Redirect) -> Self {
        self.authenticated_user = Some(redirect);
        self
    }

    /// Set the rule for anonymous sessions.
    #[must_use]
    pub fn with_unauthenticated_user(mut self, redirect: Redirect) -> Self {
        self.unauthenticated_user = Some(redirect);
        self
    }

    /// Rule for the given authentication state.
    #[must_use]
    pub const fn rule_for(&self, status: AuthStatus) -> Option<&Redirect> {
        match status {
            AuthStatus::Authenticated => self.authenticated_user.as_ref(),
            AuthStatus::Anonymous => self.unauthenticated_user.as_ref(),
        }
    }
}

/// Credential cookie configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieConfig {
    /// Base cookie name. Slot suffixes are appended to it.
    pub name: String,

    /// Signing/encryption keys, newest first. Older keys are tried on read.
    pub keys: Vec<String>,

    /// Whether credential cookies are signed.
    pub signed: bool,

    /// Whether credential cookies are encrypted (implies authenticity).
    pub encrypted: bool,
}

impl CookieConfig {
    /// Create a cookie configuration with the given base name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a key. The first key added is used for new cookies.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.keys.push(key.into());
        self
    }

    /// Enable or disable signing.
    #[must_use]
    pub const fn with_signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    /// Enable or disable encryption.
    #[must_use]
    pub const fn with_encrypted(mut self, encrypted: bool) -> Self {
        self.encrypted = encrypted;
        self
    }

    /// Name of the token-pair slot.
    #[must_use]
    pub fn tokens_cookie_name(&self) -> String {
        format!("{}{}", self.name, cookie_slots::TOKENS_SUFFIX)
    }

    /// Name of the serialized-session slot.
    #[must_use]
    pub fn session_cookie_name(&self) -> String {
        format!("{}{}", self.name, cookie_slots::SESSION_SUFFIX)
    }

    /// Options passed to the credential store on read.
    #[must_use]
    pub fn read_options(&self) -> CookieReadOptions {
        CookieReadOptions {
            keys: self.keys.clone(),
            signed: self.signed,
            encrypted: self.encrypted,
        }
    }
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "pagegate".to_string(),
            keys: Vec::new(),
            signed: false,
            encrypted: false,
        }
    }
}

/// Crypto options for a credential read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieReadOptions {
    /// Keys to try, in order.
    pub keys: Vec<String>,
    /// Verify the value's signature.
    pub signed: bool,
    /// Decrypt the value.
    pub encrypted: bool,
}

/// Process-wide gate defaults.
#[derive(Debug, Clone, Default)]
pub struct GateDefaults {
    /// Default login page for anonymous redirects.
    pub auth_page_url: Option<PageUrl>,

    /// Default app page for authenticated redirects.
    pub app_page_url: Option<PageUrl>,

    /// Default declarative redirect map.
    pub redirect_config: Option<RedirectConfig>,

    /// Credential cookie settings.
    pub cookies: CookieConfig,
}

impl GateDefaults {
    /// Create defaults with the given cookie configuration.
    #[must_use]
    pub fn new(cookies: CookieConfig) -> Self {
        Self {
            cookies,
            ..Self::default()
        }
    }

    /// Set the default auth page URL.
    #[must_use]
    pub fn with_auth_page_url(mut self, url: impl Into<PageUrl>) -> Self {
        self.auth_page_url = Some(url.into());
        self
    }

    /// Set the default app page URL.
    #[must_use]
    pub fn with_app_page_url(mut self, url: impl Into<PageUrl>) -> Self {
        self.app_page_url = Some(url.into());
        self
    }

    /// Set the default declarative redirect map.
    #[must_use]
    pub fn with_redirect_config(mut self, config: RedirectConfig) -> Self {
        self.redirect_config = Some(config);
        self
    }

    /// Load defaults from `PAGEGATE_*` environment variables and validate them.
    ///
    /// | Variable | Meaning |
    /// |---|---|
    /// | `PAGEGATE_COOKIE_NAME` | base cookie name |
    /// | `PAGEGATE_COOKIE_KEYS` | comma-separated keys, newest first |
    /// | `PAGEGATE_COOKIE_SIGNED` | `true`/`false` |
    /// | `PAGEGATE_COOKIE_ENCRYPTED` | `true`/`false` |
    /// | `PAGEGATE_AUTH_PAGE_URL` | default login page |
    /// | `PAGEGATE_APP_PAGE_URL` | default app page |
    /// | `PAGEGATE_REDIRECT_AUTHENTICATED` | declarative rule for authenticated users |
    /// | `PAGEGATE_REDIRECT_UNAUTHENTICATED` | declarative rule for anonymous users |
    ///
    /// Setting either `PAGEGATE_REDIRECT_*` variable enables the declarative map.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidConfig`] on unparsable values or failed
    /// validation.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load defaults through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`GateDefaults::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| {
            lookup(&format!("{ENV_PREFIX}{suffix}")).filter(|value| !value.trim().is_empty())
        };

        let mut cookies = CookieConfig::default();
        if let Some(name) = var("COOKIE_NAME") {
            cookies.name = name;
        }
        if let Some(keys) = var("COOKIE_KEYS") {
            cookies.keys = keys
                .split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(ToString::to_string)
                .collect();
        }
        if let Some(signed) = var("COOKIE_SIGNED") {
            cookies.signed = parse_bool("COOKIE_SIGNED", &signed)?;
        }
        if let Some(encrypted) = var("COOKIE_ENCRYPTED") {
            cookies.encrypted = parse_bool("COOKIE_ENCRYPTED", &encrypted)?;
        }

        let authenticated = var("REDIRECT_AUTHENTICATED").map(Redirect::temporary);
        let unauthenticated = var("REDIRECT_UNAUTHENTICATED").map(Redirect::temporary);
        let redirect_config = (authenticated.is_some() || unauthenticated.is_some()).then(|| {
            RedirectConfig {
                authenticated_user: authenticated,
                unauthenticated_user: unauthenticated,
            }
        });

        let defaults = Self {
            auth_page_url: var("AUTH_PAGE_URL").map(PageUrl::fixed),
            app_page_url: var("APP_PAGE_URL").map(PageUrl::fixed),
            redirect_config,
            cookies,
        };
        defaults.validate()?;
        Ok(defaults)
    }

    /// Check the defaults for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidConfig`] if the cookie name is empty, if
    /// signing or encryption is enabled without keys, or if a key is shorter
    /// than 64 bytes.
    pub fn validate(&self) -> Result<()> {
        let cookies = &self.cookies;
        if cookies.name.trim().is_empty() {
            return Err(GateError::InvalidConfig {
                reason: "cookie name must not be empty".to_string(),
            });
        }
        if (cookies.signed || cookies.encrypted) && cookies.keys.is_empty() {
            return Err(GateError::InvalidConfig {
                reason: "signed or encrypted cookies require at least one key".to_string(),
            });
        }
        if let Some(index) = cookies
            .keys
            .iter()
            .position(|key| key.len() < MIN_COOKIE_KEY_LEN)
        {
            return Err(GateError::InvalidConfig {
                reason: format!("cookie key #{index} is shorter than {MIN_COOKIE_KEY_LEN} bytes"),
            });
        }
        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(GateError::InvalidConfig {
            reason: format!("{ENV_PREFIX}{name}: expected a boolean, got `{other}`"),
        }),
    }
}

/// Per-page gate options. Unset fields fall back to [`GateDefaults`].
#[derive(Debug, Clone)]
pub struct PageGateOptions {
    /// Action for authenticated sessions.
    pub when_authed: WhenAuthed,

    /// Action for anonymous sessions.
    pub when_unauthed: WhenUnauthed,

    /// App page URL override.
    pub app_page_url: Option<PageUrl>,

    /// Auth page URL override.
    pub auth_page_url: Option<PageUrl>,

    /// Declarative redirect map override.
    pub redirect_config: Option<RedirectConfig>,

    /// Resolve the session from the bearer token (`true`) or from a
    /// pre-serialized session cookie (`false`).
    pub use_token: bool,
}

impl Default for PageGateOptions {
    fn default() -> Self {
        Self {
            when_authed: WhenAuthed::Render,
            when_unauthed: WhenUnauthed::Render,
            app_page_url: None,
            auth_page_url: None,
            redirect_config: None,
            use_token: true,
        }
    }
}

impl PageGateOptions {
    /// Options with every field at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the authenticated action.
    #[must_use]
    pub const fn when_authed(mut self, action: WhenAuthed) -> Self {
        self.when_authed = action;
        self
    }

    /// Set the anonymous action.
    #[must_use]
    pub const fn when_unauthed(mut self, action: WhenUnauthed) -> Self {
        self.when_unauthed = action;
        self
    }

    /// Override the app page URL.
    #[must_use]
    pub fn with_app_page_url(mut self, url: impl Into<PageUrl>) -> Self {
        self.app_page_url = Some(url.into());
        self
    }

    /// Override the auth page URL.
    #[must_use]
    pub fn with_auth_page_url(mut self, url: impl Into<PageUrl>) -> Self {
        self.auth_page_url = Some(url.into());
        self
    }

    /// Override the declarative redirect map.
    #[must_use]
    pub fn with_redirect_config(mut self, config: RedirectConfig) -> Self {
        self.redirect_config = Some(config);
        self
    }

    /// Choose token or cookie session resolution.
    #[must_use]
    pub const fn use_token(mut self, use_token: bool) -> Self {
        self.use_token = use_token;
        self
    }

    /// Layer these options over the process defaults.
    ///
    /// A call-site URL that is unusable (an empty fixed string) falls back to
    /// the default just like an unset one.
    #[must_use]
    pub fn merge(&self, defaults: &GateDefaults) -> MergedOptions {
        let pick = |call_site: &Option<PageUrl>, default: &Option<PageUrl>| {
            call_site
                .as_ref()
                .filter(|url| url.is_usable())
                .or(default.as_ref())
                .cloned()
        };

        MergedOptions {
            when_authed: self.when_authed,
            when_unauthed: self.when_unauthed,
            app_page_url: pick(&self.app_page_url, &defaults.app_page_url),
            auth_page_url: pick(&self.auth_page_url, &defaults.auth_page_url),
            redirect_config: self
                .redirect_config
                .clone()
                .or_else(|| defaults.redirect_config.clone()),
            use_token: self.use_token,
        }
    }
}

/// Call-site options merged over defaults; a read-only per-request snapshot.
#[derive(Debug, Clone)]
pub struct MergedOptions {
    /// Action for authenticated sessions.
    pub when_authed: WhenAuthed,
    /// Action for anonymous sessions.
    pub when_unauthed: WhenUnauthed,
    /// Effective app page URL.
    pub app_page_url: Option<PageUrl>,
    /// Effective auth page URL.
    pub auth_page_url: Option<PageUrl>,
    /// Effective declarative redirect map.
    pub redirect_config: Option<RedirectConfig>,
    /// Token or cookie resolution.
    pub use_token: bool,
}
