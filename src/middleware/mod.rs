//! Request middleware.
//!
//! - [`auth`]: Session guard and the [`AuthUser`](auth::AuthUser) extractor
//! - [`gate`]: Route-to-permission authorization
//! - [`admission`]: Global in-flight request limit
//! - [`throttle`]: Per-client login throttling
//!
//! # Pipeline
//!
//! Protected routes run the session guard first, then the gate:
//!
//! 1. `uid` cookie present, else 403
//! 2. token signature, algorithm and expiry valid, else 403
//! 3. account, role and permissions resolve, else 403 (account gone) or 500
//! 4. the route's required permission is held, else 401 `"no permission"`
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//!
//! async fn handler(auth_user: AuthUser) -> impl IntoResponse {
//!     if auth_user.has_permission("race:add") { /* ... */ }
//! }
//! ```

pub mod admission;
pub mod auth;
pub mod gate;
pub mod throttle;
