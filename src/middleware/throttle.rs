use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::anyhow;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use raceboard_core::AppError;

use crate::metrics::track_login_throttled;
use crate::state::AppState;

/// Per-client login throttle backed by a keyed governor limiter.
pub async fn throttle_login(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(limiter) = state.login_limiter.as_ref() else {
        return next.run(req).await;
    };

    let client = client_ip(&req);
    if limiter.check_key(&client).is_err() {
        warn!(client = %client, "Login attempts throttled");
        track_login_throttled();
        return AppError::too_many_requests(anyhow!("too many login attempts, slow down"))
            .into_response();
    }

    next.run(req).await
}

/// Peer address when the server exposes it, otherwise the first
/// `X-Forwarded-For` hop, otherwise a shared bucket.
fn client_ip(req: &Request) -> IpAddr {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip();
    }
    req.headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|hop| hop.trim().parse().ok())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}
