use axum::Json;
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use raceboard_auth::AuthContext;

use crate::middleware::auth::AuthUser;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfoResponse {
    pub code: i32,
    pub msg: String,
    pub data: AuthContext,
}

/// Get the caller's resolved authorization context
#[utoipa::path(
    get,
    path = "/user/info",
    responses(
        (status = 200, description = "Caller's account, identity, role and permissions", body = UserInfoResponse),
        (status = 403, description = "Missing or invalid session", body = crate::modules::auth::controller::ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Users"
)]
#[instrument(skip(auth_user), fields(account = %auth_user.account()))]
pub async fn get_user_info(auth_user: AuthUser) -> Json<UserInfoResponse> {
    Json(UserInfoResponse {
        code: 200,
        msg: "ok".to_string(),
        data: auth_user.0,
    })
}
