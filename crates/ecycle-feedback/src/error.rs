use thiserror::Error;

use ecycle_core::error::ValidationError;
use ecycle_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("remote store error: {0}")]
    Remote(#[from] StorageError),

    #[error("flush aborted after {flushed} record(s), {remaining} still pending: {source}")]
    FlushAborted {
        flushed: usize,
        remaining: usize,
        #[source]
        source: StorageError,
    },
}
