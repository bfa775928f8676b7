//! Error types rendered as the `{"code": .., "msg": ..}` JSON envelope.
//!
//! Two error types live here:
//!
//! - [`AppError`]: a generic HTTP error (status + numeric code + `anyhow` cause),
//!   used for request-shape failures and anything outside the auth pipeline.
//! - [`AuthError`]: the closed taxonomy of the login / session / authorization
//!   pipeline. Every variant maps to exactly one status and one stable code.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: i32,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            code: i32::from(status.as_u16()),
            error: err.into(),
        }
    }

    /// Same as [`AppError::new`] but with a code that differs from the status.
    pub fn with_code<E>(status: StatusCode, code: i32, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            code,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn too_many_requests<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::TOO_MANY_REQUESTS, err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let msg = if self.status.is_server_error() {
            error!(error = %self.error, "Internal error");
            "internal server error".to_string()
        } else {
            self.error.to_string()
        };

        let body = Json(json!({
            "code": self.code,
            "msg": msg,
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

/// Failures of the authentication and authorization pipeline.
///
/// The variants are grouped by the stage that produces them: login, token
/// verification, identity resolution and authorization. Token-stage variants
/// are distinct internally but share one external response.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    // login
    #[error("captcha answer missing, expired or mismatched")]
    InvalidCaptcha,
    #[error("no account matches the given account and identity")]
    AccountNotFound,
    #[error("password does not match")]
    InvalidPassword,

    // token
    #[error("session token missing")]
    TokenMissing,
    #[error("session token malformed")]
    TokenMalformed,
    #[error("session token signature mismatch")]
    TokenSignatureInvalid,
    #[error("session token expired")]
    TokenExpired,
    #[error("session token signed with unexpected algorithm `{0}`")]
    TokenAlgorithmMismatch(String),

    // resolution
    #[error("account `{0}` named by session no longer exists")]
    UserNotFound(String),
    #[error("role {0} referenced by account no longer exists")]
    RoleNotFound(i32),
    #[error("permission {0} referenced by role no longer exists")]
    PermissionNotFound(i32),

    // authorization
    #[error("missing required permission `{0}`")]
    Forbidden(String),

    #[error("store failure: {0}")]
    Store(#[source] Error),
    #[error("internal failure: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidCaptcha => StatusCode::BAD_REQUEST,
            AuthError::AccountNotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidPassword => StatusCode::UNAUTHORIZED,
            AuthError::TokenMissing
            | AuthError::TokenMalformed
            | AuthError::TokenSignatureInvalid
            | AuthError::TokenExpired
            | AuthError::TokenAlgorithmMismatch(_)
            | AuthError::UserNotFound(_) => StatusCode::FORBIDDEN,
            AuthError::Forbidden(_) => StatusCode::UNAUTHORIZED,
            AuthError::RoleNotFound(_)
            | AuthError::PermissionNotFound(_)
            | AuthError::Store(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code clients branch on.
    pub fn code(&self) -> i32 {
        match self {
            AuthError::AccountNotFound => 1,
            AuthError::InvalidPassword => 2,
            AuthError::InvalidCaptcha => 3,
            other => i32::from(other.status().as_u16()),
        }
    }

    /// Message safe to show to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCaptcha => "invalid captcha",
            AuthError::AccountNotFound => "account not found",
            AuthError::InvalidPassword => "invalid password",
            AuthError::TokenMissing
            | AuthError::TokenMalformed
            | AuthError::TokenSignatureInvalid
            | AuthError::TokenExpired
            | AuthError::TokenAlgorithmMismatch(_)
            | AuthError::UserNotFound(_) => "access denied",
            AuthError::Forbidden(_) => "no permission",
            AuthError::RoleNotFound(_) | AuthError::PermissionNotFound(_) => {
                "authorization data unavailable"
            }
            AuthError::Store(_) | AuthError::Internal(_) => "internal server error",
        }
    }

    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::InvalidCaptcha => "invalid_captcha",
            AuthError::AccountNotFound => "account_not_found",
            AuthError::InvalidPassword => "invalid_password",
            AuthError::TokenMissing => "token_missing",
            AuthError::TokenMalformed => "token_malformed",
            AuthError::TokenSignatureInvalid => "token_signature_invalid",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenAlgorithmMismatch(_) => "token_algorithm_mismatch",
            AuthError::UserNotFound(_) => "user_not_found",
            AuthError::RoleNotFound(_) => "role_not_found",
            AuthError::PermissionNotFound(_) => "permission_not_found",
            AuthError::Forbidden(_) => "forbidden",
            AuthError::Store(_) => "store",
            AuthError::Internal(_) => "internal",
        }
    }

    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            AuthError::TokenMissing
                | AuthError::TokenMalformed
                | AuthError::TokenSignatureInvalid
                | AuthError::TokenExpired
                | AuthError::TokenAlgorithmMismatch(_)
        )
    }

    /// Resolution failures that indicate referential drift in the store.
    pub fn is_integrity_anomaly(&self) -> bool {
        matches!(
            self,
            AuthError::UserNotFound(_)
                | AuthError::RoleNotFound(_)
                | AuthError::PermissionNotFound(_)
        )
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, kind = self.kind(), "Auth pipeline failure");
        }

        let body = Json(json!({
            "code": self.code(),
            "msg": self.public_message(),
        }));

        (status, body).into_response()
    }
}
