use std::net::IpAddr;
use std::sync::Arc;

use governor::DefaultKeyedRateLimiter;
use governor::RateLimiter;
use tokio::sync::Semaphore;

use raceboard_auth::AuthorizationGate;
use raceboard_config::{AuthzConfig, CaptchaConfig, CorsConfig, JwtConfig, RateLimitConfig};
use raceboard_db::AuthStore;

use crate::modules::auth::captcha::CaptchaStore;

/// Per-client login attempt limiter.
pub type LoginLimiter = DefaultKeyedRateLimiter<IpAddr>;

/// Every configuration section the HTTP layer reads.
#[derive(Clone, Debug)]
pub struct Settings {
    pub jwt: JwtConfig,
    pub captcha: CaptchaConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    pub authz: AuthzConfig,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            jwt: JwtConfig::from_env(),
            captcha: CaptchaConfig::from_env(),
            cors: CorsConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            authz: AuthzConfig::from_env(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AuthStore>,
    pub jwt_config: JwtConfig,
    pub captcha_config: CaptchaConfig,
    pub captchas: Arc<CaptchaStore>,
    pub gate: Arc<AuthorizationGate>,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub admission: Arc<Semaphore>,
    pub login_limiter: Option<Arc<LoginLimiter>>,
}

impl AppState {
    /// Builds the state around an injected store, with the default route table.
    pub fn new(store: Arc<dyn AuthStore>, settings: Settings) -> Self {
        let gate = AuthorizationGate::with_default_routes(settings.authz.unmapped_routes);
        Self::with_gate(store, settings, gate)
    }

    pub fn with_gate(
        store: Arc<dyn AuthStore>,
        settings: Settings,
        gate: AuthorizationGate,
    ) -> Self {
        let login_limiter = settings
            .rate_limit
            .login_quota()
            .map(|quota| Arc::new(RateLimiter::keyed(quota)));

        Self {
            store,
            captchas: Arc::new(CaptchaStore::new(&settings.captcha)),
            gate: Arc::new(gate),
            admission: Arc::new(Semaphore::new(settings.rate_limit.max_in_flight)),
            login_limiter,
            jwt_config: settings.jwt,
            captcha_config: settings.captcha,
            cors_config: settings.cors,
            rate_limit_config: settings.rate_limit,
        }
    }
}
