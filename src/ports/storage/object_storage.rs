use async_trait::async_trait;
use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::domain::{
    errors::StorageResult,
    value_objects::{BucketName, ObjectKey},
};

/// Binary object storage port.
///
/// The returned locator is opaque to the core beyond being an absolute URI.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync + 'static {
    /// Store `content` under `bucket/key`, replacing any existing object
    async fn upload(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        content: Bytes,
        content_type: Option<String>,
        cancel: &CancellationToken,
    ) -> StorageResult<Url>;

    /// Remove `bucket/key`. Removing a missing object is not an error.
    async fn delete(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        cancel: &CancellationToken,
    ) -> StorageResult<()>;
}
