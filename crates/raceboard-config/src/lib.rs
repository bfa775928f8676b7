//! # Raceboard Config
//!
//! Configuration types for the Raceboard API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`jwt`]: Session token signing and cookie configuration
//! - [`captcha`]: Login captcha challenge configuration
//! - [`authz`]: Authorization gate policy
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`rate_limit`]: Admission limit and login throttle configuration
//! - [`server`]: Listener addresses and database pool settings
//!
//! # Example
//!
//! ```ignore
//! use raceboard_config::{JwtConfig, CaptchaConfig, RateLimitConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let captcha_config = CaptchaConfig::from_env();
//! let rate_limit_config = RateLimitConfig::from_env();
//! ```

pub mod authz;
pub mod captcha;
pub mod cors;
pub mod jwt;
pub mod rate_limit;
pub mod server;

// Re-export commonly used types at crate root
pub use authz::{AuthzConfig, UnmappedRoutePolicy};
pub use captcha::CaptchaConfig;
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;

/// Reads an environment variable and parses it, falling back on absence or parse failure.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Reads a boolean flag; `"false"`, `"0"` and `"no"` are false, anything else set is true.
pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| {
            let v = v.trim().to_lowercase();
            v != "false" && v != "0" && v != "no"
        })
        .unwrap_or(default)
}
