use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use raceboard_auth::AuthContext;
use raceboard_core::Identity;
use raceboard_models::Role;

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{CaptchaData, CaptchaResponse, LoginRequest, LoginResponse};
use crate::modules::users::controller::UserInfoResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_captcha,
        crate::modules::users::controller::get_user_info,
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            CaptchaResponse,
            CaptchaData,
            ErrorResponse,
            UserInfoResponse,
            AuthContext,
            Role,
            Identity,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Captcha and login"),
        (name = "Users", description = "Caller identity")
    ),
    info(
        title = "Raceboard API",
        version = "0.1.0",
        description = "Competition tracking API with cookie sessions and role-based permissions.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("uid"))),
            )
        }
    }
}
