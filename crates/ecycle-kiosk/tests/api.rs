use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use ecycle_feedback::connectivity::ConnectivityMonitor;
use ecycle_feedback::queue::SubmissionQueue;
use ecycle_kiosk::state::AppState;
use ecycle_storage::error::StorageError;
use ecycle_storage::memory::MemoryStore;
use ecycle_storage::store::{BoxFuture, RemoteStore};

struct UnreachableStore;

impl RemoteStore for UnreachableStore {
    fn create<'a>(
        &'a self,
        _collection: &'a str,
        _id: Uuid,
        _document: Value,
    ) -> BoxFuture<'a, Result<Value, StorageError>> {
        Box::pin(async { Err(StorageError::Unavailable("connection refused".to_string())) })
    }

    fn list_all<'a>(&'a self, _collection: &'a str) -> BoxFuture<'a, Result<Vec<Value>, StorageError>> {
        Box::pin(async { Err(StorageError::Unavailable("connection refused".to_string())) })
    }
}

fn build(store: Arc<dyn RemoteStore>, online: bool, attach: bool) -> (Router, AppState) {
    let monitor = Arc::new(ConnectivityMonitor::new(online));
    let queue = Arc::new(SubmissionQueue::new(store, monitor));
    if attach {
        queue.attach();
    }
    let state = AppState::new(queue);
    (ecycle_kiosk::router(state.clone()), state)
}

fn app_with(store: Arc<dyn RemoteStore>, online: bool) -> (Router, AppState) {
    build(store, online, true)
}

fn app(online: bool) -> (Router, AppState) {
    app_with(Arc::new(MemoryStore::new()), online)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn form(message: &str, email: &str) -> Value {
    json!({
        "kind": "bug-report",
        "message": message,
        "rating": 4,
        "contactEmail": email,
        "category": "locations"
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = app(true);
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn online_submit_returns_created_and_lists_it() {
    let (app, _) = app(true);

    let (status, body) = send(&app, "POST", "/feedback", Some(form("bins overflow", "a@b.com"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["state"], "confirmed");
    assert_eq!(body["record"]["feedbackMessage"], "bins overflow");
    assert_eq!(body["record"]["status"], "new");

    let (_, list) = send(&app, "GET", "/feedback", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (_, pending) = send(&app, "GET", "/feedback/pending", None).await;
    assert_eq!(pending["count"], 0);
}

#[tokio::test]
async fn blank_email_is_unprocessable() {
    let (app, state) = app(true);

    let (status, body) = send(&app, "POST", "/feedback", Some(form("bins overflow", " "))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "email");

    assert_eq!(state.queue.pending_count().await, 0);
    assert!(state.queue.confirmed().await.is_empty());
}

#[tokio::test]
async fn missing_fields_fall_back_to_form_defaults() {
    let (app, _) = app(true);

    let (status, body) = send(
        &app,
        "POST",
        "/feedback",
        Some(json!({ "message": "more bins please", "contactEmail": "a@b.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["record"]["feedbackType"], "suggestion");
    assert_eq!(body["record"]["category"], "general");
    assert_eq!(body["record"]["rating"], 5);
}

#[tokio::test]
async fn unreachable_store_is_bad_gateway() {
    let (app, state) = app_with(Arc::new(UnreachableStore), true);

    let (status, body) = send(&app, "POST", "/feedback", Some(form("bins overflow", "a@b.com"))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
    assert_eq!(state.queue.pending_count().await, 0);

    let (_, notice) = send(&app, "GET", "/notice", None).await;
    assert_eq!(notice["level"], "error");
}

#[tokio::test]
async fn offline_round_trip_syncs_on_reconnect() {
    let (app, state) = app(false);

    let (status, body) = send(&app, "POST", "/feedback", Some(form("bins overflow", "a@b.com"))).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["state"], "queued");
    let id = body["record"]["_id"].clone();

    let (_, connectivity) = send(&app, "GET", "/connectivity", None).await;
    assert_eq!(connectivity["offline"], true);
    assert_eq!(connectivity["pending"], 1);

    let (_, change) = send(&app, "POST", "/connectivity", Some(json!({ "online": true }))).await;
    assert_eq!(change["changed"], true);
    assert_eq!(change["offline"], false);

    for _ in 0..200 {
        if state.queue.pending_count().await == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let (_, pending) = send(&app, "GET", "/feedback/pending", None).await;
    assert_eq!(pending["count"], 0);
    let (_, list) = send(&app, "GET", "/feedback", None).await;
    assert_eq!(list[0]["_id"], id);

    let (_, again) = send(&app, "POST", "/connectivity", Some(json!({ "online": true }))).await;
    assert_eq!(again["changed"], false);
}

#[tokio::test]
async fn manual_flush_and_refresh() {
    // Not attached: flushing is driven by the caller, not the monitor.
    let (app, state) = build(Arc::new(MemoryStore::new()), false, false);

    send(&app, "POST", "/feedback", Some(form("one", "a@b.com"))).await;
    send(&app, "POST", "/feedback", Some(form("two", "a@b.com"))).await;

    let (status, body) = send(&app, "POST", "/feedback/flush", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "kiosk is offline");

    send(&app, "POST", "/connectivity", Some(json!({ "online": true }))).await;
    assert_eq!(state.queue.pending_count().await, 2);

    let (status, report) = send(&app, "POST", "/feedback/flush", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["flushed"], 2);
    assert_eq!(report["remaining"], 0);
    assert_eq!(state.queue.pending_count().await, 0);

    let (status, refreshed) = send(&app, "POST", "/feedback/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(refreshed["confirmed"], 2);
}
