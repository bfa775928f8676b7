use axum::{
    extract::{OriginalUri, Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{info, instrument};

use raceboard_auth::AuthContext;
use raceboard_core::AuthError;

use crate::metrics::track_authorization_check;
use crate::state::AppState;

/// Authorization gate. Runs after [`require_session`](super::auth::require_session).
#[instrument(skip_all, fields(path))]
pub async fn authorize_route(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    // Nested routers strip their prefix from `req.uri()`.
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());
    tracing::Span::current().record("path", path.as_str());

    let ctx = req
        .extensions()
        .get::<AuthContext>()
        .ok_or(AuthError::TokenMissing)?;

    let permission = state.gate.required_permission(&path).unwrap_or("none");
    let decision = state.gate.check(&path, ctx);
    track_authorization_check(decision.is_ok(), permission);

    if let Err(err) = decision {
        info!(account = %ctx.account, required = permission, "Request denied");
        return Err(err);
    }

    Ok(next.run(req).await)
}
