use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use ecycle_core::models::feedback::{FeedbackDraft, FeedbackRecord};
use ecycle_feedback::queue::{FlushReport, Submission};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct PendingFeedback {
    pub count: usize,
    pub items: Vec<FeedbackRecord>,
}

#[derive(Serialize)]
pub struct RefreshOutcome {
    pub confirmed: usize,
}

/// Confirmed ("Submitted") feedback, newest first.
pub async fn list_feedback(State(state): State<AppState>) -> Json<Vec<FeedbackRecord>> {
    Json(state.queue.confirmed().await)
}

/// 201 when the store accepted the record, 202 when it was queued offline.
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(draft): Json<FeedbackDraft>,
) -> Result<(StatusCode, Json<Submission>), ApiError> {
    let submission = state.queue.submit(draft).await?;
    let status = match submission {
        Submission::Confirmed(_) => StatusCode::CREATED,
        Submission::Queued(_) => StatusCode::ACCEPTED,
    };
    Ok((status, Json(submission)))
}

pub async fn list_pending(State(state): State<AppState>) -> Json<PendingFeedback> {
    let items = state.queue.pending().await;
    Json(PendingFeedback {
        count: items.len(),
        items,
    })
}

pub async fn refresh_feedback(
    State(state): State<AppState>,
) -> Result<Json<RefreshOutcome>, ApiError> {
    let confirmed = state.queue.refresh().await?;
    Ok(Json(RefreshOutcome { confirmed }))
}

/// Same pass the reconnect trigger runs. Refused while offline.
pub async fn flush_pending(State(state): State<AppState>) -> Result<Json<FlushReport>, ApiError> {
    if state.monitor().is_offline() {
        return Err(ApiError::Offline);
    }
    let report = state.queue.flush().await?;
    Ok(Json(report))
}
