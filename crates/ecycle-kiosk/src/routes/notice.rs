use axum::Json;
use axum::extract::State;

use ecycle_feedback::notice::Notice;

use crate::state::AppState;

/// The banner the UI should show right now, or `null`.
pub async fn current_notice(State(state): State<AppState>) -> Json<Option<Notice>> {
    Json(state.queue.notices().current())
}
