#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use axum::routing::{delete, get, post, put};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use raceboard::router::build_router;
use raceboard::state::{AppState, Settings};
use raceboard_auth::create_session_token;
use raceboard_config::{
    AuthzConfig, CaptchaConfig, CorsConfig, JwtConfig, RateLimitConfig, UnmappedRoutePolicy,
};
use raceboard_core::{Identity, hash_password};
use raceboard_db::{AuthStore, MemoryStore};
use raceboard_models::{Account, Permission, PermissionAction, ResourceType, Role};

pub const PASSWORD: &str = "testpass123";

pub mod roles {
    use raceboard_models::RoleId;
    pub const ADMIN: RoleId = RoleId::new(1);
    pub const STUDENT: RoleId = RoleId::new(3);
    pub const TEACHER: RoleId = RoleId::new(4);
    pub const EMPTY: RoleId = RoleId::new(9);
}

pub mod permissions {
    use raceboard_models::PermissionId;
    pub const ROLE_ADD: PermissionId = PermissionId::new(1);
    pub const RECORD_DELETE: PermissionId = PermissionId::new(2);
    pub const RACE_QUERY: PermissionId = PermissionId::new(3);
    pub const RECORD_ADD: PermissionId = PermissionId::new(4);
}

pub fn test_settings() -> Settings {
    Settings {
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            session_expiry: 604_800,
            cookie_name: "uid".to_string(),
            cookie_secure: false,
        },
        captcha: CaptchaConfig::default(),
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:8080".to_string()],
        },
        rate_limit: RateLimitConfig {
            login_enabled: false,
            ..RateLimitConfig::default()
        },
        authz: AuthzConfig {
            unmapped_routes: UnmappedRoutePolicy::Allow,
        },
    }
}

/// Seeds the store used by most tests:
///
/// - `admin` (student, role 1 with `role:add`, `race:query`)
/// - `s2021001` (student, role 3 with `race:query`, `record:add`)
/// - `t001` (teacher, role 4 with `race:query`)
/// - `nobody` (teacher, role 9 with no permissions)
pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());

    for (id, label) in [
        (roles::ADMIN, "super_admin"),
        (roles::STUDENT, "student"),
        (roles::TEACHER, "teacher"),
        (roles::EMPTY, "empty"),
    ] {
        store
            .insert_role(Role {
                id,
                label: label.to_string(),
                description: None,
            })
            .await;
    }

    for (id, resource, action) in [
        (permissions::ROLE_ADD, ResourceType::Role, PermissionAction::Add),
        (permissions::RECORD_DELETE, ResourceType::Record, PermissionAction::Delete),
        (permissions::RACE_QUERY, ResourceType::Race, PermissionAction::Query),
        (permissions::RECORD_ADD, ResourceType::Record, PermissionAction::Add),
    ] {
        store
            .insert_permission(Permission {
                id,
                label: format!("{resource}:{action}"),
                action,
                resource,
            })
            .await;
    }

    store.grant(roles::ADMIN, permissions::ROLE_ADD).await;
    store.grant(roles::ADMIN, permissions::RACE_QUERY).await;
    store.grant(roles::STUDENT, permissions::RACE_QUERY).await;
    store.grant(roles::STUDENT, permissions::RECORD_ADD).await;
    store.grant(roles::TEACHER, permissions::RACE_QUERY).await;

    let hash = hash_password(PASSWORD).unwrap();
    for (account, identity, role) in [
        ("admin", Identity::Student, roles::ADMIN),
        ("s2021001", Identity::Student, roles::STUDENT),
        ("t001", Identity::Teacher, roles::TEACHER),
        ("nobody", Identity::Teacher, roles::EMPTY),
    ] {
        store
            .insert_account(Account::new(account, hash.clone(), identity, role))
            .await;
    }

    store
}

async fn ok() -> &'static str {
    "ok"
}

/// Stand-ins for the business handlers mounted behind the gate.
pub fn business_routes() -> Router<AppState> {
    Router::new()
        .route("/role/add", post(ok))
        .route("/role/list", get(ok))
        .route("/record/add", post(ok))
        .route("/record/delete", delete(ok))
        .route("/race/list", get(ok))
        .route("/race/update", put(ok))
        .route("/file/get_file_url", get(ok))
}

pub fn app_with(store: Arc<MemoryStore>, settings: Settings) -> Router {
    let store: Arc<dyn AuthStore> = store;
    build_router(AppState::new(store, settings), business_routes())
}

pub async fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = seeded_store().await;
    (app_with(store.clone(), test_settings()), store)
}

/// A valid session cookie header value, minted directly.
pub fn session_cookie(account: &str, identity: Identity) -> String {
    let token = create_session_token(account, identity, &test_settings().jwt).unwrap();
    format!("uid={token}")
}

pub fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// `name=value` of the named `Set-Cookie`, if present.
pub fn set_cookie(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&format!("{name}=")))
        .map(str::to_owned)
}

pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap_or_default().to_string()
}

/// Fetches a captcha and returns `(cookie pair, answer)`.
pub async fn fetch_captcha(app: &Router) -> (String, String) {
    let response = send(app, request("GET", "/auth/captcha", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = cookie_pair(&set_cookie(&response, "captcha_id").expect("captcha cookie"));
    let body = body_json(response).await;
    let answer = body["data"]["answer"].as_str().unwrap().to_string();
    (cookie, answer)
}

pub fn login_body(account: &str, password: &str, identity: &str, code: &str) -> Value {
    json!({
        "account": account,
        "password": password,
        "identity": identity,
        "code": code,
    })
}

/// Full captcha + login flow, returning the `uid=...` cookie pair.
pub async fn login(app: &Router, account: &str, identity: &str) -> String {
    let (captcha, answer) = fetch_captcha(app).await;
    let response = send(
        app,
        request(
            "POST",
            "/auth/login",
            Some(&captcha),
            Some(login_body(account, PASSWORD, identity, &answer)),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    cookie_pair(&set_cookie(&response, "uid").expect("session cookie"))
}
