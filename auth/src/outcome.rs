//! Page results produced by the gate.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

/// A redirect directive.
///
/// Directives built by the legacy rules are always temporary; declarative
/// rules are returned exactly as configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    /// Where to send the client. Never empty.
    pub destination: String,

    /// Whether the redirect may be cached as permanent.
    pub permanent: bool,

    /// Set to `Some(false)` to redirect outside the host's base path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<bool>,
}

impl Redirect {
    /// Create a temporary redirect.
    #[must_use]
    pub fn temporary(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            permanent: false,
            base_path: None,
        }
    }

    /// Create a permanent redirect.
    #[must_use]
    pub fn permanent(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            permanent: true,
            base_path: None,
        }
    }

    /// Set the base path flag.
    #[must_use]
    pub const fn with_base_path(mut self, base_path: bool) -> Self {
        self.base_path = Some(base_path);
        self
    }
}

/// Final result of handling a page request.
///
/// Serializes to exactly one of `{"props": {..}}`, `{"redirect": {..}}` or
/// `{"notFound": true}`.
#[derive(Debug, Clone, PartialEq)]
pub enum PageResult {
    /// Render the page with these props.
    Props(Map<String, Value>),
    /// Redirect instead of rendering.
    Redirect(Redirect),
    /// Respond with not-found.
    NotFound,
}

impl PageResult {
    /// Props result from a JSON value.
    ///
    /// # Non-object values
    ///
    /// Props are always a JSON object. Anything else (an array, string,
    /// number, `null`) is **discarded** and the page renders with empty props
    /// plus the session; a warning is logged. Build from a [`Map`] with
    /// [`from_map`](Self::from_map) to rule this out at compile time.
    #[must_use]
    pub fn props(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Props(map),
            other => {
                warn!(kind = json_kind(&other), "Page props must be a JSON object, discarding");
                Self::Props(Map::new())
            }
        }
    }

    /// Props result from a JSON object.
    #[must_use]
    pub const fn from_map(props: Map<String, Value>) -> Self {
        Self::Props(props)
    }

    /// The props, if this is a render result.
    #[must_use]
    pub const fn as_props(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Props(props) => Some(props),
            _ => None,
        }
    }

    /// The redirect, if this is a redirect result.
    #[must_use]
    pub const fn as_redirect(&self) -> Option<&Redirect> {
        match self {
            Self::Redirect(redirect) => Some(redirect),
            _ => None,
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Serialize for PageResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Props(props) => map.serialize_entry("props", props)?,
            Self::Redirect(redirect) => map.serialize_entry("redirect", redirect)?,
            Self::NotFound => map.serialize_entry("notFound", &true)?,
        }
        map.end()
    }
}
