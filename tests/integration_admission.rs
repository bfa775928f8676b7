mod common;

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use common::*;
use raceboard::router::build_router;
use raceboard::state::AppState;
use raceboard_core::Identity;
use raceboard_db::AuthStore;
use tokio::sync::Notify;
use tower::ServiceExt;

#[tokio::test]
async fn test_requests_over_admission_limit_are_refused() {
    let store: Arc<dyn AuthStore> = seeded_store().await;
    let mut settings = test_settings();
    settings.rate_limit.max_in_flight = 1;

    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let slow = {
        let entered = entered.clone();
        let release = release.clone();
        get(move || {
            let entered = entered.clone();
            let release = release.clone();
            async move {
                entered.notify_one();
                release.notified().await;
                "done"
            }
        })
    };

    let app = build_router(
        AppState::new(store, settings),
        Router::new().route("/slow", slow),
    );
    let cookie = session_cookie("admin", Identity::Student);

    let in_flight = tokio::spawn(
        app.clone()
            .oneshot(request("GET", "/slow", Some(&cookie), None)),
    );
    entered.notified().await;

    let refused = send(&app, request("GET", "/auth/captcha", None, None)).await;
    assert_eq!(refused.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_json(refused).await["code"], 429);

    release.notify_one();
    let finished = in_flight.await.unwrap().unwrap();
    assert_eq!(finished.status(), StatusCode::OK);

    let admitted = send(&app, request("GET", "/auth/captcha", None, None)).await;
    assert_eq!(admitted.status(), StatusCode::OK);
}
