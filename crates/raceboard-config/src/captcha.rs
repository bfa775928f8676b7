//! Captcha challenge configuration.
//!
//! # Environment Variables
//!
//! - `CAPTCHA_TTL`: Seconds a challenge stays answerable (default: 300)
//! - `CAPTCHA_LENGTH`: Number of digits in an answer (default: 5)
//! - `CAPTCHA_COOKIE_NAME`: Cookie carrying the challenge correlator (default: `captcha_id`)
//! - `CAPTCHA_EXPOSE_ANSWER`: Include the answer in the issuance response (default: true)
//! - `CAPTCHA_MAX_PENDING`: Unanswered challenges kept at once (default: 10000)

use std::env;

use crate::{env_flag, env_or};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptchaConfig {
    pub ttl_seconds: u64,
    pub length: usize,
    pub cookie_name: String,
    pub expose_answer: bool,
    /// Oldest-expiring challenges are evicted past this many.
    pub max_pending: usize,
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            length: 5,
            cookie_name: "captcha_id".to_string(),
            expose_answer: true,
            max_pending: 10_000,
        }
    }
}

impl CaptchaConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ttl_seconds: env_or("CAPTCHA_TTL", defaults.ttl_seconds),
            length: env_or("CAPTCHA_LENGTH", defaults.length).clamp(1, 12),
            cookie_name: env::var("CAPTCHA_COOKIE_NAME").unwrap_or(defaults.cookie_name),
            expose_answer: env_flag("CAPTCHA_EXPOSE_ANSWER", defaults.expose_answer),
            max_pending: env_or("CAPTCHA_MAX_PENDING", defaults.max_pending).max(1),
        }
    }
}
