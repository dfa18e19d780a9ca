use aws_sdk_s3::Client;
use uuid::Uuid;

use ecycle_core::store_keys;

use crate::error::StorageError;
use crate::objects;
use crate::store::{BoxFuture, RemoteStore};

/// Collection store backed by one JSON object per document.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl RemoteStore for S3Store {
    fn create<'a>(
        &'a self,
        collection: &'a str,
        id: Uuid,
        document: serde_json::Value,
    ) -> BoxFuture<'a, Result<serde_json::Value, StorageError>> {
        Box::pin(async move {
            let key = store_keys::record(collection, id);
            objects::put_json(&self.client, &self.bucket, &key, &document).await?;
            tracing::debug!(bucket = %self.bucket, key = %key, "document stored");
            Ok(document)
        })
    }

    fn list_all<'a>(
        &'a self,
        collection: &'a str,
    ) -> BoxFuture<'a, Result<Vec<serde_json::Value>, StorageError>> {
        Box::pin(async move {
            let prefix = store_keys::collection_prefix(collection);
            let keys = objects::list_keys(&self.client, &self.bucket, &prefix).await?;

            let mut documents = Vec::with_capacity(keys.len());
            for key in &keys {
                let body = objects::get_object(&self.client, &self.bucket, key).await?;
                documents.push(serde_json::from_slice(&body)?);
            }

            tracing::debug!(
                bucket = %self.bucket,
                collection,
                count = documents.len(),
                "collection listed"
            );
            Ok(documents)
        })
    }
}
