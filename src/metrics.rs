use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

const UNMATCHED_PATH: &str = "unmatched";

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if observability is enabled via OBSERVABILITY_ENABLED env var
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true)
    })
}

/// Install the Prometheus recorder and its upkeep task.
/// Returns `Ok(None)` if observability is disabled.
pub fn init_metrics() -> Result<Option<PrometheusHandle>, BuildError> {
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0,
            ],
        )?
        .install_recorder()?;

    // Spawn upkeep task to clean stale metrics
    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

/// Metrics middleware to track HTTP requests
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = path_label(&req);

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Route template for labels. Unrouted requests share one label so arbitrary
/// client paths cannot grow the series count.
fn path_label(req: &Request) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED_PATH.to_owned(), |p| p.as_str().to_owned())
}

/// Router for metrics server
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

pub fn track_login_success() {
    if !is_observability_enabled() {
        return;
    }
    counter!("logins_total", "status" => "success").increment(1);
}

pub fn track_login_failure(reason: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("logins_total", "status" => "failure", "reason" => reason).increment(1);
}

pub fn track_login_throttled() {
    if !is_observability_enabled() {
        return;
    }
    counter!("logins_throttled_total").increment(1);
}

pub fn track_session_issued() {
    if !is_observability_enabled() {
        return;
    }
    counter!("session_tokens_issued_total").increment(1);
}

/// `outcome` is `"valid"` or the rejection kind.
pub fn track_token_validation(outcome: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("session_token_validations_total", "outcome" => outcome).increment(1);
}

pub fn track_resolution_anomaly(kind: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("identity_resolution_anomalies_total", "kind" => kind).increment(1);
}

pub fn track_authorization_check(allowed: bool, permission: &str) {
    if !is_observability_enabled() {
        return;
    }
    let status = if allowed { "allowed" } else { "denied" };
    counter!("authorization_checks_total", "permission" => permission.to_string(), "status" => status)
        .increment(1);
}

pub fn track_admission_rejected() {
    if !is_observability_enabled() {
        return;
    }
    counter!("admission_rejections_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[test]
    fn test_unrouted_path_uses_constant_label() {
        let req = Request::builder()
            .uri("/no/such/route/8f3a")
            .body(Body::empty())
            .unwrap();
        assert_eq!(path_label(&req), "unmatched");
    }

    #[tokio::test]
    async fn test_routed_path_uses_template() {
        let app = Router::new().route(
            "/race/{id}",
            get(|req: Request| async move { path_label(&req) }),
        );
        let response = app
            .oneshot(Request::builder().uri("/race/42").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        assert_eq!(&body[..], b"/race/{id}");
    }
}
