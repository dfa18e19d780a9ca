//! ecycle-kiosk library root.
//!
//! The local service a recycling-kiosk UI talks to. Exposes the router and
//! config loading so integration tests can drive them without a socket.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/feedback",
            get(routes::feedback::list_feedback).post(routes::feedback::submit_feedback),
        )
        .route("/feedback/pending", get(routes::feedback::list_pending))
        .route("/feedback/refresh", post(routes::feedback::refresh_feedback))
        .route("/feedback/flush", post(routes::feedback::flush_pending))
        .route(
            "/connectivity",
            get(routes::connectivity::get_connectivity)
                .post(routes::connectivity::report_connectivity),
        )
        .route("/notice", get(routes::notice::current_notice))
        .layer(axum_mw::from_fn(middleware::request_log::request_log))
        .layer(cors)
        .with_state(state)
}
