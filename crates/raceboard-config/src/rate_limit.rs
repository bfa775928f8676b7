//! Admission and login throttling configuration.
//!
//! Two independent limits protect the API:
//!
//! - A global admission limit caps the number of requests in flight at once.
//!   When every slot is taken, new requests are refused immediately.
//! - A per-client token bucket (Governor) throttles `POST /auth/login`.
//!
//! # Environment Variables
//!
//! - `MAX_IN_FLIGHT_REQUESTS`: Admission slots (default: 128)
//! - `RATE_LIMIT_LOGIN_ENABLED`: Toggle the login throttle (default: true)
//! - `RATE_LIMIT_LOGIN_PER_SECOND`: Login attempts replenished per second (default: 1)
//! - `RATE_LIMIT_LOGIN_BURST_SIZE`: Login attempts a client may burst (default: 5)

use std::num::NonZeroU32;

use governor::Quota;

use crate::{env_flag, env_or};

/// Rate limit configuration for the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum number of requests processed concurrently.
    pub max_in_flight: usize,

    /// Whether login attempts are throttled per client.
    pub login_enabled: bool,

    /// Login tokens replenished per second.
    pub login_per_second: u32,

    /// Maximum login tokens a client can accumulate.
    pub login_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 128,
            login_enabled: true,
            login_per_second: 1,
            login_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    /// Creates a new `RateLimitConfig` from environment variables.
    ///
    /// Falls back to default values if environment variables are not set
    /// or cannot be parsed.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_in_flight: env_or("MAX_IN_FLIGHT_REQUESTS", defaults.max_in_flight).max(1),
            login_enabled: env_flag("RATE_LIMIT_LOGIN_ENABLED", defaults.login_enabled),
            login_per_second: env_or("RATE_LIMIT_LOGIN_PER_SECOND", defaults.login_per_second),
            login_burst_size: env_or("RATE_LIMIT_LOGIN_BURST_SIZE", defaults.login_burst_size),
        }
    }

    /// Builds the Governor quota for login attempts.
    ///
    /// Returns `None` when throttling is disabled or a rate of zero is configured.
    #[must_use]
    pub fn login_quota(&self) -> Option<Quota> {
        if !self.login_enabled {
            return None;
        }
        let per_second = NonZeroU32::new(self.login_per_second)?;
        let burst = NonZeroU32::new(self.login_burst_size).unwrap_or(per_second);
        Some(Quota::per_second(per_second).allow_burst(burst))
    }
}
