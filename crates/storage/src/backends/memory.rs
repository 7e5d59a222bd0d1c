//! In-memory storage backend for tests and doc examples.

use crate::error::{StorageError, StorageResult};
use crate::traits::BlobStore;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Mutex;

/// Blob store keeping objects in a process-local map.
#[derive(Default)]
pub struct MemoryBackend {
    objects: Mutex<HashMap<(String, String), Bytes>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects across all buckets.
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for MemoryBackend {
    async fn put(&self, bucket: &str, key: &str, data: Bytes) -> StorageResult<()> {
        let mut objects = self.objects.lock().unwrap();
        objects.insert((bucket.to_string(), key.to_string()), data);
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        let objects = self.objects.lock().unwrap();
        objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("{bucket}/{key}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_roundtrip() {
        let store = MemoryBackend::new();
        store
            .put("customer-bucket", "profile-images/10/abc", Bytes::from_static(b"helloWorld"))
            .await
            .unwrap();
        let data = store.get("customer-bucket", "profile-images/10/abc").await.unwrap();
        assert_eq!(&data[..], b"helloWorld");
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = MemoryBackend::new();
        match store.get("customer-bucket", "nope").await {
            Err(StorageError::NotFound(_)) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn overwrite_replaces_content() {
        let store = MemoryBackend::new();
        store.put("b", "k", Bytes::from_static(b"one")).await.unwrap();
        store.put("b", "k", Bytes::from_static(b"two")).await.unwrap();
        assert_eq!(store.len(), 1);
        let data = store.get("b", "k").await.unwrap();
        assert_eq!(&data[..], b"two");
    }
}
