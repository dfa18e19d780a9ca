use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::error::StorageError;
use crate::store::{BoxFuture, RemoteStore};

type Collections = HashMap<String, Vec<(Uuid, serde_json::Value)>>;

/// Process-local collection store. Nothing survives a restart.
///
/// Documents keep insertion order; a `create` with a known id replaces the
/// earlier document in place.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, StorageError> {
        self.collections
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl RemoteStore for MemoryStore {
    fn create<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
        document: serde_json::Value,
    ) -> BoxFuture<'a, Result<serde_json::Value, StorageError>> {
        Box::pin(async move {
            let mut collections = self.lock()?;
            let docs = collections.entry(collection.to_string()).or_default();
            match docs.iter_mut().find(|(existing, _)| *existing == id) {
                Some((_, slot)) => *slot = document.clone(),
                None => docs.push((id, document.clone())),
            }
            Ok(document)
        })
    }

    fn list_all<'a>(
        &'a self,
        collection: &'a str,
    ) -> BoxFuture<'a, Result<Vec<serde_json::Value>, StorageError>> {
        Box::pin(async move {
            let collections = self.lock()?;
            Ok(collections
                .get(collection)
                .map(|docs| docs.iter().map(|(_, doc)| doc.clone()).collect())
                .unwrap_or_default())
        })
    }
}
