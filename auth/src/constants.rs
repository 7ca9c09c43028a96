//! Gate constants.

/// Cookie slot suffixes appended to the configured cookie name.
pub mod cookie_slots {
    /// Slot holding the bearer token pair (token mode).
    pub const TOKENS_SUFFIX: &str = ".AuthUserTokens";

    /// Slot holding a pre-serialized session (cookie mode).
    pub const SESSION_SUFFIX: &str = ".AuthUser";
}

/// Prop key under which the serialized session is injected.
pub const SESSION_PROP_KEY: &str = "AuthUserSerialized";

/// Minimum length in bytes of a cookie signing/encryption key.
pub const MIN_COOKIE_KEY_LEN: usize = 64;

/// Environment variable prefix read by [`GateDefaults::from_env`](crate::config::GateDefaults::from_env).
pub const ENV_PREFIX: &str = "PAGEGATE_";
