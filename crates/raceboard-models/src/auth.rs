//! Login and captcha DTOs.

use raceboard_core::Identity;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64, message = "Account must be between 1 and 64 characters"))]
    pub account: String,
    #[validate(length(min = 1, max = 128, message = "Password must be between 1 and 128 characters"))]
    pub password: String,
    pub identity: Identity,
    /// Answer to the captcha issued by `GET /auth/captcha`. A missing or
    /// empty answer is left for the captcha check to reject.
    #[serde(default)]
    #[validate(length(max = 16, message = "Code must be at most 16 characters"))]
    pub code: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("account", &self.account)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

/// Body of a successful login. The session itself travels in a cookie.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub code: i32,
    pub msg: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CaptchaData {
    /// Expected answer. Omitted when the server is configured not to expose it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// `data:` URI of the challenge picture.
    #[serde(rename = "picPath")]
    pub pic_path: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CaptchaResponse {
    pub code: i32,
    pub msg: String,
    pub data: CaptchaData,
}
