//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;

/// Binary object storage addressed by bucket + key.
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Put an object, overwriting any existing one under the same key.
    async fn put(&self, bucket: &str, key: &str, data: Bytes) -> StorageResult<()>;

    /// Get an object's content.
    async fn get(&self, bucket: &str, key: &str) -> StorageResult<Bytes>;
}
