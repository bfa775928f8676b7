use anyhow::anyhow;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use raceboard_core::AppError;

use crate::metrics::track_admission_rejected;
use crate::state::AppState;

/// Global admission limit.
///
/// Each request holds one semaphore permit until its response is produced.
/// When none is free the request is refused with 429 instead of queued.
pub async fn admission_control(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let Ok(_permit) = state.admission.clone().try_acquire_owned() else {
        warn!(
            limit = state.rate_limit_config.max_in_flight,
            "Admission limit reached, rejecting request"
        );
        track_admission_rejected();
        return AppError::too_many_requests(anyhow!("too many requests")).into_response();
    };

    next.run(req).await
}
