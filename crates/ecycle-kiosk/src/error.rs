use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use ecycle_core::error::{FeedbackField, ValidationError};
use ecycle_feedback::error::FeedbackError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    /// The action needs a connection the kiosk does not have.
    Offline,
    /// The remote store rejected or could not be reached.
    Upstream(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<FeedbackField>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    error: e.to_string(),
                    field: Some(e.field),
                },
            ),
            ApiError::Offline => (
                StatusCode::CONFLICT,
                ErrorBody {
                    error: "kiosk is offline".to_string(),
                    field: None,
                },
            ),
            ApiError::Upstream(msg) => {
                tracing::warn!("remote store error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        error: msg,
                        field: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<FeedbackError> for ApiError {
    fn from(e: FeedbackError) -> Self {
        match e {
            FeedbackError::Validation(v) => ApiError::Validation(v),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}
