use std::future::Future;
use std::pin::Pin;

use uuid::Uuid;

use crate::error::StorageError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Generic create/read access to a hosted collection store.
///
/// Documents are opaque JSON; callers own the schema. Implementations must
/// treat a repeated `create` with the same id as the same document.
pub trait RemoteStore: Send + Sync {
    /// Write `document` into `collection` under `id`. Returns the stored document.
    fn create<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
        document: serde_json::Value,
    ) -> BoxFuture<'a, Result<serde_json::Value, StorageError>>;

    /// Read every document in `collection`.
    fn list_all<'a>(
        &'a self,
        collection: &'a str,
    ) -> BoxFuture<'a, Result<Vec<serde_json::Value>, StorageError>>;
}
