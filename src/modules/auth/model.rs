pub use raceboard_models::auth::{CaptchaData, CaptchaResponse, LoginRequest, LoginResponse};
