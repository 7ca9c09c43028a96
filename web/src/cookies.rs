//! Cookie-backed credential store.
//!
//! Reads credentials from the request's `Cookie` headers. Signed values are
//! verified and encrypted values decrypted with the `cookie` crate's signed
//! and private jars, trying each configured key in order so keys can rotate.

use cookie::{Cookie, CookieJar, Key};
use http::{header::COOKIE, HeaderMap};
use pagegate_auth::config::CookieReadOptions;
use pagegate_auth::providers::CredentialStore;
use pagegate_auth::{GateError, RequestContext};
use tracing::debug;

/// Credential store over request cookies.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieCredentialStore;

impl CookieCredentialStore {
    /// Create a cookie credential store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Collect every cookie sent with the request into a jar.
///
/// Unparsable pairs are skipped.
#[must_use]
pub fn jar_from_headers(headers: &HeaderMap) -> CookieJar {
    let mut jar = CookieJar::new();
    for value in headers.get_all(COOKIE) {
        let Ok(value) = value.to_str() else {
            continue;
        };
        for cookie in Cookie::split_parse_encoded(value).flatten() {
            jar.add_original(cookie.into_owned());
        }
    }
    jar
}

fn keys(options: &CookieReadOptions) -> pagegate_auth::Result<Vec<Key>> {
    if options.keys.is_empty() {
        return Err(GateError::InvalidConfig {
            reason: "signed or encrypted cookies require at least one key".to_string(),
        });
    }
    options
        .keys
        .iter()
        .enumerate()
        .map(|(index, secret)| {
            Key::try_from(secret.as_bytes()).map_err(|e| GateError::InvalidConfig {
                reason: format!("cookie key #{index} is unusable: {e}"),
            })
        })
        .collect()
}

impl CredentialStore for CookieCredentialStore {
    fn read(
        &self,
        name: &str,
        ctx: &RequestContext,
        options: &CookieReadOptions,
    ) -> pagegate_auth::Result<Option<String>> {
        let jar = jar_from_headers(ctx.headers());
        if jar.get(name).is_none() {
            return Ok(None);
        }

        if !options.signed && !options.encrypted {
            return Ok(jar.get(name).map(|cookie| cookie.value().to_string()));
        }

        for key in keys(options)? {
            let verified = if options.encrypted {
                jar.private(&key).get(name)
            } else {
                jar.signed(&key).get(name)
            };
            if let Some(cookie) = verified {
                return Ok(Some(cookie.value().to_string()));
            }
        }

        debug!(cookie = name, "Cookie failed verification under every key, ignoring");
        Ok(None)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use http::{HeaderValue, Method, Uri};

    const KEY_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const KEY_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn context(cookie_header: &str) -> RequestContext {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie_header).unwrap());
        RequestContext::new(Method::GET, Uri::from_static("/"), headers)
    }

    fn signed_header(name: &str, value: &str, secret: &str) -> String {
        let key = Key::try_from(secret.as_bytes()).unwrap();
        let mut jar = CookieJar::new();
        jar.signed_mut(&key)
            .add(Cookie::new(name.to_string(), value.to_string()));
        jar.get(name).unwrap().encoded().to_string()
    }

    fn private_header(name: &str, value: &str, secret: &str) -> String {
        let key = Key::try_from(secret.as_bytes()).unwrap();
        let mut jar = CookieJar::new();
        jar.private_mut(&key)
            .add(Cookie::new(name.to_string(), value.to_string()));
        jar.get(name).unwrap().encoded().to_string()
    }

    fn signed(keys: &[&str]) -> CookieReadOptions {
        CookieReadOptions {
            keys: keys.iter().map(ToString::to_string).collect(),
            signed: true,
            encrypted: false,
        }
    }

    #[test]
    fn test_plain_read() {
        let ctx = context("other=1; app.AuthUser=hello");
        let value = CookieCredentialStore::new()
            .read("app.AuthUser", &ctx, &CookieReadOptions::default())
            .unwrap();
        assert_eq!(value.as_deref(), Some("hello"));
    }

    #[test]
    fn test_missing_cookie_is_none() {
        let ctx = context("other=1");
        let value = CookieCredentialStore::new()
            .read("app.AuthUser", &ctx, &signed(&[KEY_A]))
            .unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_signed_read_verifies() {
        let ctx = context(&signed_header("app.AuthUserTokens", r#"{"idToken":"t"}"#, KEY_A));
        let value = CookieCredentialStore::new()
            .read("app.AuthUserTokens", &ctx, &signed(&[KEY_A]))
            .unwrap();
        assert_eq!(value.as_deref(), Some(r#"{"idToken":"t"}"#));
    }

    #[test]
    fn test_signed_read_with_rotated_key() {
        let ctx = context(&signed_header("app.AuthUser", "v", KEY_B));
        let value = CookieCredentialStore::new()
            .read("app.AuthUser", &ctx, &signed(&[KEY_A, KEY_B]))
            .unwrap();
        assert_eq!(value.as_deref(), Some("v"));
    }

    #[test]
    fn test_tampered_cookie_reads_as_absent() {
        let ctx = context("app.AuthUser=forged-value");
        let value = CookieCredentialStore::new()
            .read("app.AuthUser", &ctx, &signed(&[KEY_A]))
            .unwrap();
        assert_eq!(value, None);

        let ctx = context(&signed_header("app.AuthUser", "v", KEY_B));
        let value = CookieCredentialStore::new()
            .read("app.AuthUser", &ctx, &signed(&[KEY_A]))
            .unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_encrypted_read() {
        let ctx = context(&private_header("app.AuthUser", "secret", KEY_A));
        let options = CookieReadOptions {
            keys: vec![KEY_A.to_string()],
            signed: false,
            encrypted: true,
        };
        let value = CookieCredentialStore::new()
            .read("app.AuthUser", &ctx, &options)
            .unwrap();
        assert_eq!(value.as_deref(), Some("secret"));
    }

    #[test]
    fn test_short_key_is_config_error() {
        let ctx = context("app.AuthUser=v");
        let err = CookieCredentialStore::new()
            .read("app.AuthUser", &ctx, &signed(&["short"]))
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_multiple_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("b=2"));
        let jar = jar_from_headers(&headers);
        assert_eq!(jar.get("a").map(Cookie::value), Some("1"));
        assert_eq!(jar.get("b").map(Cookie::value), Some("2"));
    }
}
