use std::sync::Arc;

use ecycle_feedback::connectivity::ConnectivityMonitor;
use ecycle_feedback::queue::SubmissionQueue;
use ecycle_storage::client::{self, ClientOptions};
use ecycle_storage::memory::MemoryStore;
use ecycle_storage::s3::S3Store;
use ecycle_storage::store::RemoteStore;

use crate::config::{KioskConfig, StoreBackend};

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub queue: Arc<SubmissionQueue>,
}

impl AppState {
    pub fn new(queue: Arc<SubmissionQueue>) -> Self {
        Self { queue }
    }

    /// Wire the store, the connectivity monitor and the queue from config.
    /// The queue is subscribed to the monitor before it is returned.
    pub async fn from_config(config: &KioskConfig) -> Self {
        let store = build_store(&config.store).await;
        let monitor = Arc::new(ConnectivityMonitor::new(config.start_online));
        let queue = Arc::new(
            SubmissionQueue::new(store, monitor)
                .with_collection(config.collection.clone())
                .with_notice_ttl(config.notice_ttl()),
        );
        queue.attach();
        Self { queue }
    }

    pub fn monitor(&self) -> &Arc<ConnectivityMonitor> {
        self.queue.monitor()
    }
}

async fn build_store(backend: &StoreBackend) -> Arc<dyn RemoteStore> {
    match backend {
        StoreBackend::Memory => {
            tracing::info!("using in-memory feedback store");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::S3 {
            bucket,
            region,
            endpoint_url,
        } => {
            tracing::info!(bucket = %bucket, "using S3 feedback store");
            let options = ClientOptions {
                region: region.clone(),
                endpoint_url: endpoint_url.clone(),
            };
            let s3 = client::build_client(&options).await;
            Arc::new(S3Store::new(s3, bucket.clone()))
        }
    }
}
