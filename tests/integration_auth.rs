mod common;

use axum::http::{StatusCode, header};
use common::*;
use raceboard::state::Settings;
use raceboard_config::RateLimitConfig;

#[tokio::test]
async fn test_captcha_issues_cookie_and_picture() {
    let (app, _) = test_app().await;

    let response = send(&app, request("GET", "/auth/captcha", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = set_cookie(&response, "captcha_id").expect("captcha cookie");
    assert!(cookie.contains("HttpOnly"));

    let body = body_json(response).await;
    assert_eq!(body["code"], 200);
    let answer = body["data"]["answer"].as_str().unwrap();
    assert_eq!(answer.len(), 5);
    assert!(answer.chars().all(|c| c.is_ascii_digit()));
    assert!(
        body["data"]["picPath"]
            .as_str()
            .unwrap()
            .starts_with("data:image/svg+xml;base64,")
    );
}

#[tokio::test]
async fn test_captcha_answer_hidden_when_not_exposed() {
    let store = seeded_store().await;
    let mut settings = test_settings();
    settings.captcha.expose_answer = false;
    let app = app_with(store, settings);

    let response = send(&app, request("GET", "/auth/captcha", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["data"]["answer"].is_null());
}

#[tokio::test]
async fn test_login_success_sets_session_cookie() {
    let (app, _) = test_app().await;
    let (captcha, answer) = fetch_captcha(&app).await;

    let response = send(
        &app,
        request(
            "POST",
            "/auth/login",
            Some(&captcha),
            Some(login_body("s2021001", PASSWORD, "student", &answer)),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let session = set_cookie(&response, "uid").expect("session cookie");
    assert!(session.contains("HttpOnly"));
    assert!(session.contains("Path=/"));
    assert!(session.contains("Max-Age=604800"));

    let body = body_json(response).await;
    assert_eq!(body["code"], 200);
}

#[tokio::test]
async fn test_login_session_cookie_grants_access() {
    let (app, _) = test_app().await;
    let cookie = login(&app, "t001", "teacher").await;

    let response = send(&app, request("GET", "/user/info", Some(&cookie), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["account"], "t001");
    assert_eq!(body["data"]["identity"], "teacher");
}

#[tokio::test]
async fn test_login_wrong_captcha() {
    let (app, _) = test_app().await;
    let (captcha, answer) = fetch_captcha(&app).await;
    let wrong = if answer == "00000" { "11111" } else { "00000" };

    let response = send(
        &app,
        request(
            "POST",
            "/auth/login",
            Some(&captcha),
            Some(login_body("s2021001", PASSWORD, "student", wrong)),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(set_cookie(&response, "uid").is_none());
    let body = body_json(response).await;
    assert_eq!(body["code"], 3);
}

#[tokio::test]
async fn test_login_without_captcha_cookie() {
    let (app, _) = test_app().await;
    let (_, answer) = fetch_captcha(&app).await;

    let response = send(
        &app,
        request(
            "POST",
            "/auth/login",
            None,
            Some(login_body("s2021001", PASSWORD, "student", &answer)),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], 3);
}

#[tokio::test]
async fn test_captcha_is_single_use() {
    let (app, _) = test_app().await;
    let (captcha, answer) = fetch_captcha(&app).await;
    let body = login_body("s2021001", PASSWORD, "student", &answer);

    let first = send(
        &app,
        request("POST", "/auth/login", Some(&captcha), Some(body.clone())),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let replay = send(&app, request("POST", "/auth/login", Some(&captcha), Some(body))).await;
    assert_eq!(replay.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(replay).await["code"], 3);
}

#[tokio::test]
async fn test_failed_login_consumes_captcha() {
    let (app, _) = test_app().await;
    let (captcha, answer) = fetch_captcha(&app).await;

    let failed = send(
        &app,
        request(
            "POST",
            "/auth/login",
            Some(&captcha),
            Some(login_body("s2021001", "wrong-password", "student", &answer)),
        ),
    )
    .await;
    assert_eq!(failed.status(), StatusCode::UNAUTHORIZED);

    let retry = send(
        &app,
        request(
            "POST",
            "/auth/login",
            Some(&captcha),
            Some(login_body("s2021001", PASSWORD, "student", &answer)),
        ),
    )
    .await;
    assert_eq!(retry.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_unknown_account() {
    let (app, _) = test_app().await;
    let (captcha, answer) = fetch_captcha(&app).await;

    let response = send(
        &app,
        request(
            "POST",
            "/auth/login",
            Some(&captcha),
            Some(login_body("ghost", PASSWORD, "student", &answer)),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], 1);
    assert_eq!(body["msg"], "account not found");
}

#[tokio::test]
async fn test_login_identity_mismatch_is_not_found() {
    let (app, _) = test_app().await;
    let (captcha, answer) = fetch_captcha(&app).await;

    let response = send(
        &app,
        request(
            "POST",
            "/auth/login",
            Some(&captcha),
            Some(login_body("t001", PASSWORD, "student", &answer)),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], 1);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (app, _) = test_app().await;
    let (captcha, answer) = fetch_captcha(&app).await;

    let response = send(
        &app,
        request(
            "POST",
            "/auth/login",
            Some(&captcha),
            Some(login_body("s2021001", "wrong-password", "student", &answer)),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie(&response, "uid").is_none());
    let body = body_json(response).await;
    assert_eq!(body["code"], 2);
    assert_eq!(body["msg"], "invalid password");
}

#[tokio::test]
async fn test_login_deleted_account_is_not_found() {
    let (app, store) = test_app().await;
    assert!(store.soft_delete_account("s2021001").await);
    let (captcha, answer) = fetch_captcha(&app).await;

    let response = send(
        &app,
        request(
            "POST",
            "/auth/login",
            Some(&captcha),
            Some(login_body("s2021001", PASSWORD, "student", &answer)),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_missing_field_is_bad_request() {
    let (app, _) = test_app().await;
    let (captcha, _) = fetch_captcha(&app).await;

    let response = send(
        &app,
        request(
            "POST",
            "/auth/login",
            Some(&captcha),
            Some(serde_json::json!({ "account": "s2021001", "identity": "student" })),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_login_unknown_identity_is_bad_request() {
    let (app, _) = test_app().await;
    let (captcha, answer) = fetch_captcha(&app).await;

    let response = send(
        &app,
        request(
            "POST",
            "/auth/login",
            Some(&captcha),
            Some(login_body("s2021001", PASSWORD, "admin", &answer)),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_throttled_per_client() {
    let store = seeded_store().await;
    let settings = Settings {
        rate_limit: RateLimitConfig {
            login_enabled: true,
            login_per_second: 1,
            login_burst_size: 2,
            ..RateLimitConfig::default()
        },
        ..test_settings()
    };
    let app = app_with(store, settings);

    let attempt = || {
        axum::http::Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "198.51.100.20")
            .body(axum::body::Body::from(
                serde_json::to_vec(&login_body("s2021001", PASSWORD, "student", "00000")).unwrap(),
            ))
            .unwrap()
    };

    for _ in 0..2 {
        let response = send(&app, attempt()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let throttled = send(&app, attempt()).await;
    assert_eq!(throttled.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_json(throttled).await["code"], 429);

    // Another client still has its own bucket.
    let other = axum::http::Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", "198.51.100.21")
        .body(axum::body::Body::from(
            serde_json::to_vec(&login_body("s2021001", PASSWORD, "student", "00000")).unwrap(),
        ))
        .unwrap();
    assert_eq!(send(&app, other).await.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_empty_code_is_invalid_captcha() {
    let (app, _) = test_app().await;
    let (captcha, _) = fetch_captcha(&app).await;

    let response = send(
        &app,
        request(
            "POST",
            "/auth/login",
            Some(&captcha),
            Some(login_body("s2021001", PASSWORD, "student", "")),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], 3);
    assert_eq!(body["msg"], "invalid captcha");
}

#[tokio::test]
async fn test_login_missing_code_is_invalid_captcha() {
    let (app, _) = test_app().await;
    let (captcha, _) = fetch_captcha(&app).await;

    let response = send(
        &app,
        request(
            "POST",
            "/auth/login",
            Some(&captcha),
            Some(serde_json::json!({
                "account": "s2021001",
                "password": PASSWORD,
                "identity": "student",
            })),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], 3);
}

#[tokio::test]
async fn test_failed_login_clears_captcha_cookie() {
    let (app, _) = test_app().await;
    let (captcha, answer) = fetch_captcha(&app).await;

    let response = send(
        &app,
        request(
            "POST",
            "/auth/login",
            Some(&captcha),
            Some(login_body("s2021001", "wrong-password", "student", &answer)),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let cleared = set_cookie(&response, "captcha_id").expect("captcha cookie removal");
    assert!(cleared.contains("Max-Age=0"));
    assert!(set_cookie(&response, "uid").is_none());
    assert_eq!(body_json(response).await["code"], 2);
}
