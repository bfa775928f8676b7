use axum::http::{HeaderValue, Method, header};
use axum::middleware::{from_fn, from_fn_with_state};
use anyhow::anyhow;
use axum::Router;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use raceboard_core::AppError;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::admission::admission_control;
use crate::middleware::auth::require_session;
use crate::middleware::gate::authorize_route;
use crate::modules::auth::router::init_auth_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    build_router(state, Router::new())
}

/// Assembles the application.
///
/// Routes in `protected` are mounted next to `/user/info` behind the session
/// guard and the authorization gate; give them their full paths (for example
/// `/race/add`) so the gate's prefix table sees the same path the client sent.
///
/// The guard also wraps the fallback, so any path outside `/auth` and the
/// docs needs a session before it can even learn the route does not exist.
pub fn build_router(state: AppState, protected: Router<AppState>) -> Router {
    let protected = init_users_router()
        .merge(protected)
        .fallback(route_not_found)
        .layer(from_fn_with_state(state.clone(), authorize_route))
        .layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/auth", init_auth_router(&state))
        .merge(protected)
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(from_fn_with_state(state, admission_control))
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(logging_middleware))
}

async fn route_not_found() -> AppError {
    AppError::not_found(anyhow!("route not found"))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
