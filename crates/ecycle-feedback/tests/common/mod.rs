//! Shared fakes for queue tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use uuid::Uuid;

use ecycle_core::models::feedback::{FeedbackCategory, FeedbackDraft, FeedbackKind, FeedbackRecord};
use ecycle_storage::error::StorageError;
use ecycle_storage::memory::MemoryStore;
use ecycle_storage::store::{BoxFuture, RemoteStore};

/// Memory-backed store that records every call and can be told to fail or stall.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    creates: Mutex<Vec<FeedbackRecord>>,
    fail_on: Mutex<HashSet<usize>>,
    fail_lists: Mutex<bool>,
    lists: AtomicUsize,
    hold: Mutex<Option<(Arc<Notify>, Arc<Notify>)>>,
    hold_list: Mutex<Option<(Arc<Notify>, Arc<Notify>)>>,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the nth `create` call (1-based, counting every attempt) fail.
    pub fn fail_create(&self, nth: usize) {
        self.fail_on.lock().unwrap().insert(nth);
    }

    pub fn fail_lists(&self) {
        *self.fail_lists.lock().unwrap() = true;
    }

    /// Stall the next `create` call. Returns (entered, release).
    pub fn hold_next_create(&self) -> (Arc<Notify>, Arc<Notify>) {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        *self.hold.lock().unwrap() = Some((entered.clone(), release.clone()));
        (entered, release)
    }

    /// Stall the next `list_all` call after it has read the store.
    /// Returns (entered, release).
    pub fn hold_next_list(&self) -> (Arc<Notify>, Arc<Notify>) {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        *self.hold_list.lock().unwrap() = Some((entered.clone(), release.clone()));
        (entered, release)
    }

    /// Write a raw document straight into the backing store, bypassing call recording.
    pub async fn seed(&self, collection: &str, id: Uuid, document: serde_json::Value) {
        self.inner.create(collection, id, document).await.unwrap();
    }

    /// Every record passed to `create`, in call order, including failed attempts.
    pub fn created(&self) -> Vec<FeedbackRecord> {
        self.creates.lock().unwrap().clone()
    }

    pub fn created_ids(&self) -> Vec<Uuid> {
        self.created().iter().map(|r| r.id).collect()
    }

    pub fn list_calls(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }
}

impl RemoteStore for RecordingStore {
    fn create<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
        document: serde_json::Value,
    ) -> BoxFuture<'a, Result<serde_json::Value, StorageError>> {
        Box::pin(async move {
            let record: FeedbackRecord = serde_json::from_value(document.clone())?;
            let nth = {
                let mut creates = self.creates.lock().unwrap();
                creates.push(record);
                creates.len()
            };

            let hold = self.hold.lock().unwrap().take();
            if let Some((entered, release)) = hold {
                entered.notify_one();
                release.notified().await;
            }

            if self.fail_on.lock().unwrap().contains(&nth) {
                return Err(StorageError::PutObject(format!("injected failure #{nth}")));
            }
            self.inner.create(collection, id, document).await
        })
    }

    fn list_all<'a>(
        &'a self,
        collection: &'a str,
    ) -> BoxFuture<'a, Result<Vec<serde_json::Value>, StorageError>> {
        Box::pin(async move {
            self.lists.fetch_add(1, Ordering::SeqCst);
            if *self.fail_lists.lock().unwrap() {
                return Err(StorageError::ListObjects("injected list failure".to_string()));
            }
            let documents = self.inner.list_all(collection).await?;

            let hold = self.hold_list.lock().unwrap().take();
            if let Some((entered, release)) = hold {
                entered.notify_one();
                release.notified().await;
            }
            Ok(documents)
        })
    }
}

pub fn draft(message: &str) -> FeedbackDraft {
    FeedbackDraft {
        kind: FeedbackKind::BugReport,
        message: message.to_string(),
        rating: 4,
        contact_email: "a@b.com".to_string(),
        category: FeedbackCategory::Locations,
    }
}
