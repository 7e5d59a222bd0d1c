//! Object storage abstraction for profile images.
//!
//! This crate provides:
//! - The `BlobStore` trait: put/get of binary objects under a bucket + key
//! - Backends: S3-compatible (AWS SDK) and in-memory (tests)

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::{memory::MemoryBackend, s3::S3Backend};
pub use error::{StorageError, StorageResult};
pub use traits::BlobStore;

use std::sync::Arc;

/// Create a blob store from configuration.
pub async fn from_config(config: &configs::StorageConfig) -> StorageResult<Arc<dyn BlobStore>> {
    config.validate().map_err(|e| StorageError::Config(e.to_string()))?;
    let backend = S3Backend::new(
        config.endpoint.clone(),
        config.region.clone(),
        config.force_path_style,
    )
    .await;
    Ok(Arc::new(backend))
}
