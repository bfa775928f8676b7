use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::instrument;
use utoipa::ToSchema;

use raceboard_core::AuthError;

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{CaptchaData, CaptchaResponse, LoginRequest, LoginResponse};
use super::service::AuthService;

/// Error envelope shared by every endpoint.
#[derive(ToSchema)]
pub struct ErrorResponse {
    pub code: i32,
    pub msg: String,
}

/// Log in and receive the session cookie
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, `uid` session cookie set", body = LoginResponse),
        (status = 400, description = "Captcha missing, expired or wrong (code 3), or malformed body", body = ErrorResponse),
        (status = 401, description = "Wrong password (code 2)", body = ErrorResponse),
        (status = 404, description = "No account for this identity (code 1)", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many login attempts", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), (CookieJar, AuthError)> {
    let captcha_cookie = state.captcha_config.cookie_name.clone();
    let captcha_id = jar.get(&captcha_cookie).map(|c| c.value().to_owned());
    // The challenge is spent either way, so the correlator goes too.
    let jar = jar.remove(Cookie::build(captcha_cookie).path("/"));

    let token = match AuthService::login(&state, captcha_id.as_deref(), dto).await {
        Ok(token) => token,
        Err(err) => return Err((jar, err)),
    };

    let session = Cookie::build((state.jwt_config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(state.jwt_config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(state.jwt_config.session_expiry));

    Ok((
        jar.add(session),
        Json(LoginResponse {
            code: 200,
            msg: "login successful".to_string(),
        }),
    ))
}

/// Issue a captcha challenge
#[utoipa::path(
    get,
    path = "/auth/captcha",
    responses(
        (status = 200, description = "Challenge issued, correlator cookie set", body = CaptchaResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar))]
pub async fn get_captcha(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<CaptchaResponse>) {
    let challenge = state.captchas.issue().await;

    let cookie = Cookie::build((state.captcha_config.cookie_name.clone(), challenge.id))
        .path("/")
        .http_only(true)
        .secure(state.jwt_config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            i64::try_from(state.captcha_config.ttl_seconds).unwrap_or(i64::MAX),
        ));

    let answer = state
        .captcha_config
        .expose_answer
        .then_some(challenge.answer);

    (
        jar.add(cookie),
        Json(CaptchaResponse {
            code: 200,
            msg: "ok".to_string(),
            data: CaptchaData {
                answer,
                pic_path: challenge.picture,
            },
        }),
    )
}
