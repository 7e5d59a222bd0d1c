//! S3-compatible storage backend using AWS SDK.

use crate::error::{StorageError, StorageResult};
use crate::traits::BlobStore;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::instrument;

/// Object store backed by S3 or any S3-compatible service (e.g. MinIO).
///
/// Credentials come from the ambient AWS credential chain; a custom
/// endpoint and path-style addressing cover non-AWS deployments.
pub struct S3Backend {
    client: Client,
}

impl S3Backend {
    pub async fn new(
        endpoint: Option<String>,
        region: Option<String>,
        force_path_style: bool,
    ) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        let shared = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        builder = builder.force_path_style(force_path_style);
        Self { client: Client::from_conf(builder.build()) }
    }
}

#[async_trait]
impl BlobStore for S3Backend {
    #[instrument(skip(self, data), fields(bucket = %bucket, key = %key, len = data.len()))]
    async fn put(&self, bucket: &str, key: &str, data: Bytes) -> StorageResult<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(data.into())
            .send()
            .await
            .map_err(|e| StorageError::S3(Box::new(e)))?;
        Ok(())
    }

    #[instrument(skip(self), fields(bucket = %bucket, key = %key))]
    async fn get(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().map(|se| se.is_no_such_key()).unwrap_or(false) {
                    StorageError::NotFound(format!("{bucket}/{key}"))
                } else {
                    StorageError::S3(Box::new(e))
                }
            })?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::S3(Box::new(e)))?
            .into_bytes();

        Ok(bytes)
    }
}
