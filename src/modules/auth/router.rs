use axum::middleware::from_fn_with_state;
use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::throttle::throttle_login;
use crate::state::AppState;

use super::controller::{get_captcha, login_user};

pub fn init_auth_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            post(login_user).route_layer(from_fn_with_state(state.clone(), throttle_login)),
        )
        .route("/captcha", get(get_captcha))
}
