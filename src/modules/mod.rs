pub mod auth;
pub mod users;

pub use self::auth::model::LoginRequest;
