use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use raceboard_auth::{AuthContext, resolve_identity, verify_token};
use raceboard_core::{AuthError, Identity};

use crate::metrics::{track_resolution_anomaly, track_token_validation};
use crate::state::AppState;

/// Session guard.
///
/// Reads the session cookie, verifies the token, rebuilds the caller's
/// [`AuthContext`] from the store and attaches it to the request. Any failure
/// ends the request here; downstream handlers only ever see a complete context.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = jar
        .get(&state.jwt_config.cookie_name)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::TokenMissing)
        .inspect_err(|err| track_token_validation(err.kind()))?;

    let claims = verify_token(&token, &state.jwt_config).map_err(|err| {
        debug!(reason = err.kind(), "Session token rejected");
        track_token_validation(err.kind());
        err
    })?;
    track_token_validation("valid");

    let ctx = resolve_identity(state.store.as_ref(), &claims)
        .await
        .map_err(|err| {
            if err.is_integrity_anomaly() {
                warn!(account = %claims.account, reason = err.kind(), "Identity resolution anomaly");
                track_resolution_anomaly(err.kind());
            }
            err
        })?;

    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

/// Extractor for the context attached by [`require_session`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthContext);

impl AuthUser {
    pub fn account(&self) -> &str {
        &self.0.account
    }

    pub fn identity(&self) -> Identity {
        self.0.identity
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.0.has_permission(permission)
    }

    pub fn has_any_permission(&self, permissions: &[&str]) -> bool {
        permissions.iter().any(|p| self.has_permission(p))
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(AuthUser)
            .ok_or(AuthError::TokenMissing)
    }
}
