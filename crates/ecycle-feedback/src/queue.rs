use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use ecycle_core::models::feedback::{FeedbackDraft, FeedbackRecord};
use ecycle_core::store_keys;
use ecycle_storage::error::StorageError;
use ecycle_storage::store::RemoteStore;

use crate::connectivity::{ConnectivityMonitor, Transition};
use crate::error::FeedbackError;
use crate::notice::{Notice, NoticeBoard};

const QUEUED: &str = "Feedback saved locally. It will sync when you're back online!";
const SUBMITTED: &str = "Thank you for your feedback!";
const SUBMIT_FAILED: &str = "Failed to submit feedback. Please try again.";
const SYNCED: &str = "Pending feedback synced successfully!";
const SYNC_FAILED: &str = "Failed to sync pending feedback.";

/// Where a successful submission ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "record", rename_all = "snake_case")]
pub enum Submission {
    /// Offline: buffered in the pending queue.
    Queued(FeedbackRecord),
    /// Online: acknowledged by the remote store.
    Confirmed(FeedbackRecord),
}

impl Submission {
    pub fn record(&self) -> &FeedbackRecord {
        match self {
            Self::Queued(record) | Self::Confirmed(record) => record,
        }
    }
}

/// Outcome of one flush pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlushReport {
    pub flushed: usize,
    pub remaining: usize,
    /// Another flush was already running; this call did nothing.
    pub skipped: bool,
    /// The confirmed set was re-read from the store after the pass.
    pub refreshed: bool,
}

#[derive(Default)]
struct QueueState {
    pending: VecDeque<FeedbackRecord>,
    /// Newest first.
    confirmed: Vec<FeedbackRecord>,
}

impl QueueState {
    fn confirm(&mut self, record: FeedbackRecord) {
        self.pending.retain(|p| p.id != record.id);
        self.confirmed.retain(|c| c.id != record.id);
        self.confirmed.insert(0, record);
    }
}

/// Owns the pending queue and the confirmed set and mediates every write to
/// the remote store.
///
/// A record lives in exactly one of the two collections. The state lock is
/// never held across a store call, so submissions keep working while a flush
/// is waiting on the network.
pub struct SubmissionQueue {
    store: Arc<dyn RemoteStore>,
    monitor: Arc<ConnectivityMonitor>,
    collection: String,
    state: Mutex<QueueState>,
    flushing: AtomicBool,
    notices: NoticeBoard,
}

impl SubmissionQueue {
    pub fn new(store: Arc<dyn RemoteStore>, monitor: Arc<ConnectivityMonitor>) -> Self {
        Self {
            store,
            monitor,
            collection: store_keys::FEEDBACK.to_string(),
            state: Mutex::new(QueueState::default()),
            flushing: AtomicBool::new(false),
            notices: NoticeBoard::default(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notices = NoticeBoard::new(ttl);
        self
    }

    /// Flush whenever the monitor reports the connection is back.
    ///
    /// The flush runs as a detached task; its errors are logged and the
    /// unsent records wait for the next online transition.
    pub fn attach(self: &Arc<Self>) {
        let queue = Arc::downgrade(self);
        self.monitor.on_transition(move |transition| {
            if transition != Transition::Online {
                return;
            }
            let Some(queue) = queue.upgrade() else {
                return;
            };
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(async move {
                        if let Err(e) = queue.flush().await {
                            warn!(error = %e, "background flush failed");
                        }
                    });
                }
                Err(_) => warn!("no async runtime available, pending feedback stays queued"),
            }
        });
    }

    pub fn monitor(&self) -> &Arc<ConnectivityMonitor> {
        &self.monitor
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Validate and stamp a draft, then queue it (offline) or send it (online).
    ///
    /// A direct send that fails is reported to the caller and the record is
    /// dropped; it is not moved to the pending queue.
    pub async fn submit(&self, draft: FeedbackDraft) -> Result<Submission, FeedbackError> {
        let record = FeedbackRecord::from_draft(draft, Timestamp::now()).inspect_err(|e| {
            debug!(field = %e.field, "feedback rejected");
        })?;

        if self.monitor.is_offline() {
            let pending = {
                let mut state = self.state.lock().await;
                state.pending.push_back(record.clone());
                state.pending.len()
            };
            info!(feedback.id = %record.id, pending, "offline, feedback queued");
            self.notices.post(Notice::success(QUEUED));
            return Ok(Submission::Queued(record));
        }

        if let Err(e) = self.send(&record).await {
            warn!(feedback.id = %record.id, error = %e, "feedback submission failed");
            self.notices.post(Notice::error(SUBMIT_FAILED));
            return Err(e.into());
        }

        self.state.lock().await.confirm(record.clone());
        info!(feedback.id = %record.id, "feedback submitted");
        self.notices.post(Notice::success(SUBMITTED));
        Ok(Submission::Confirmed(record))
    }

    /// Drain the pending queue to the remote store in FIFO order.
    ///
    /// Works on a snapshot of the queue: each acknowledged record is removed
    /// from the live queue as soon as the store accepts it, and records
    /// appended while the pass is running are left for the next one. The
    /// first store failure ends the pass; records already sent stay
    /// confirmed, the rest stay pending.
    pub async fn flush(&self) -> Result<FlushReport, FeedbackError> {
        let Some(_guard) = FlushGuard::acquire(&self.flushing) else {
            debug!("flush already in progress");
            return Ok(FlushReport {
                skipped: true,
                ..FlushReport::default()
            });
        };

        let batch: Vec<FeedbackRecord> = self.state.lock().await.pending.iter().cloned().collect();
        if batch.is_empty() {
            return Ok(FlushReport::default());
        }

        info!(count = batch.len(), "flushing pending feedback");

        let mut flushed = 0;
        for record in &batch {
            let sent = record.restamped(Timestamp::now());
            if let Err(source) = self.send(&sent).await {
                let remaining = self.pending_count().await;
                warn!(
                    feedback.id = %record.id,
                    error = %source,
                    flushed,
                    remaining,
                    "flush aborted"
                );
                self.notices.post(Notice::error(SYNC_FAILED));
                return Err(FeedbackError::FlushAborted {
                    flushed,
                    remaining,
                    source,
                });
            }
            debug!(feedback.id = %sent.id, "pending feedback sent");
            self.state.lock().await.confirm(sent);
            flushed += 1;
        }

        let refreshed = match self.refresh().await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "confirmed feedback refresh failed after flush");
                false
            }
        };

        let remaining = self.pending_count().await;
        info!(flushed, remaining, "pending feedback synced");
        self.notices.post(Notice::success(SYNCED));

        Ok(FlushReport {
            flushed,
            remaining,
            skipped: false,
            refreshed,
        })
    }

    /// Merge a fresh read of the collection into the confirmed set.
    /// Returns the number of confirmed records.
    ///
    /// The store never deletes, so locally confirmed records missing from the
    /// read (acknowledged while it was in flight) are kept. Documents that do
    /// not parse as feedback are skipped.
    pub async fn refresh(&self) -> Result<usize, FeedbackError> {
        let documents = self.store.list_all(&self.collection).await?;
        let mut records: Vec<FeedbackRecord> = documents
            .into_iter()
            .filter_map(|document| {
                let id = document.get("_id").cloned();
                match serde_json::from_value::<FeedbackRecord>(document) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!(feedback.id = ?id, error = %e, "skipping unreadable feedback document");
                        None
                    }
                }
            })
            .collect();

        let mut state = self.state.lock().await;
        for local in &state.confirmed {
            if !records.iter().any(|r| r.id == local.id) {
                records.push(local.clone());
            }
        }
        records.retain(|r| !state.pending.iter().any(|p| p.id == r.id));
        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        let count = records.len();
        state.confirmed = records;

        debug!(count, collection = %self.collection, "confirmed feedback refreshed");
        Ok(count)
    }

    pub async fn pending_count(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    /// Pending records, oldest first.
    pub async fn pending(&self) -> Vec<FeedbackRecord> {
        self.state.lock().await.pending.iter().cloned().collect()
    }

    /// Confirmed records, newest first.
    pub async fn confirmed(&self) -> Vec<FeedbackRecord> {
        self.state.lock().await.confirmed.clone()
    }

    async fn send(&self, record: &FeedbackRecord) -> Result<(), StorageError> {
        let document = serde_json::to_value(record)?;
        self.store.create(&self.collection, record.id, document).await?;
        Ok(())
    }
}

/// Clears the in-flight flag when the flush ends, however it ends.
struct FlushGuard<'a>(&'a AtomicBool);

impl<'a> FlushGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for FlushGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
