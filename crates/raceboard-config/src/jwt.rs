use std::env;

use crate::{env_flag, env_or};

/// Seven days, the fixed validity window of a login session.
pub const DEFAULT_SESSION_EXPIRY: i64 = 7 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    /// HMAC secret for HS256 signing.
    pub secret: String,
    /// Session lifetime in seconds.
    pub session_expiry: i64,
    /// Name of the cookie carrying the session token.
    pub cookie_name: String,
    /// Whether the session cookie is marked `Secure`.
    pub cookie_secure: bool,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            session_expiry: env_or("JWT_SESSION_EXPIRY", DEFAULT_SESSION_EXPIRY),
            cookie_name: env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| "uid".to_string()),
            cookie_secure: env_flag("COOKIE_SECURE", false),
        }
    }
}
