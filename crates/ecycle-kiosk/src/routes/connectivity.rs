use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Serialize)]
pub struct ConnectivityStatus {
    pub offline: bool,
    pub pending: usize,
}

/// Body the UI shell posts from its `online`/`offline` listeners.
#[derive(Deserialize)]
pub struct ConnectivityReport {
    pub online: bool,
}

#[derive(Serialize)]
pub struct ConnectivityChange {
    pub offline: bool,
    /// `false` when the report matched the state we already had.
    pub changed: bool,
}

pub async fn get_connectivity(State(state): State<AppState>) -> Json<ConnectivityStatus> {
    Json(ConnectivityStatus {
        offline: state.monitor().is_offline(),
        pending: state.queue.pending_count().await,
    })
}

/// Going online kicks off a background flush; the response does not wait for it.
pub async fn report_connectivity(
    State(state): State<AppState>,
    Json(report): Json<ConnectivityReport>,
) -> Json<ConnectivityChange> {
    let monitor = state.monitor();
    let changed = if report.online {
        monitor.on_online_transition()
    } else {
        monitor.on_offline_transition()
    };
    Json(ConnectivityChange {
        offline: monitor.is_offline(),
        changed,
    })
}
