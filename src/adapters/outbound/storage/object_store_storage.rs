use async_trait::async_trait;
use bytes::Bytes;
use object_store::{
    local::LocalFileSystem, memory::InMemory, path::Path as ObjectPath, Attribute, Attributes,
    ObjectStore, PutOptions, PutPayload,
};
use std::{path::Path, sync::Arc};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    adapters::outbound::cancellable,
    domain::{
        errors::{StorageError, StorageResult},
        value_objects::{BucketName, ObjectKey},
    },
    ports::storage::ObjectStorage,
};

/// Base locator of objects held by [`ObjectStoreStorage::in_memory`]
pub const IN_MEMORY_BASE_URL: &str = "memory://catalog/";

/// [`ObjectStorage`] over any `object_store` backend.
///
/// Objects live at `{bucket}/{key}`; the locator handed back is that path
/// resolved against the public base URL.
#[derive(Clone)]
pub struct ObjectStoreStorage {
    store: Arc<dyn ObjectStore>,
    base_url: Url,
    content_type_attributes: bool,
}

impl std::fmt::Debug for ObjectStoreStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreStorage")
            .field("store", &self.store.to_string())
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl ObjectStoreStorage {
    pub fn new(store: Arc<dyn ObjectStore>, mut base_url: Url) -> Self {
        // Url::join replaces the last segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            store,
            base_url,
            content_type_attributes: true,
        }
    }

    /// Volatile storage for development and tests
    pub fn in_memory() -> StorageResult<Self> {
        let base_url = Url::parse(IN_MEMORY_BASE_URL).map_err(|_| StorageError::InvalidLocator {
            locator: IN_MEMORY_BASE_URL.to_string(),
        })?;
        Ok(Self::new(Arc::new(InMemory::new()), base_url))
    }

    /// Files under `root`, created if missing. Locators are `file://` URLs
    /// unless a public base URL is given.
    pub fn local(root: impl AsRef<Path>, public_base_url: Option<Url>) -> StorageResult<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root).map_err(|e| StorageError::InfrastructureError {
            message: format!("Failed to create storage root {}", root.display()),
            source: Some(e.to_string()),
        })?;

        let store = LocalFileSystem::new_with_prefix(root)?;

        let base_url = match public_base_url {
            Some(url) => url,
            None => {
                let canonical =
                    root.canonicalize()
                        .map_err(|e| StorageError::InfrastructureError {
                            message: format!("Failed to resolve storage root {}", root.display()),
                            source: Some(e.to_string()),
                        })?;
                Url::from_directory_path(&canonical).map_err(|_| StorageError::InvalidLocator {
                    locator: canonical.display().to_string(),
                })?
            }
        };

        // The local filesystem backend cannot persist object attributes
        Ok(Self::new(Arc::new(store), base_url).without_content_type())
    }

    /// Do not send the content type as an object attribute
    pub fn without_content_type(mut self) -> Self {
        self.content_type_attributes = false;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn object_path(bucket: &BucketName, key: &ObjectKey) -> ObjectPath {
        ObjectPath::from(format!("{}/{}", bucket.as_str(), key.as_str()))
    }

    fn locator(&self, path: &ObjectPath) -> StorageResult<Url> {
        self.base_url
            .join(path.as_ref())
            .map_err(|_| StorageError::InvalidLocator {
                locator: format!("{}{}", self.base_url, path),
            })
    }
}

#[async_trait]
impl ObjectStorage for ObjectStoreStorage {
    async fn upload(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        content: Bytes,
        content_type: Option<String>,
        cancel: &CancellationToken,
    ) -> StorageResult<Url> {
        let path = Self::object_path(bucket, key);

        let mut options = PutOptions::default();
        if let Some(content_type) = content_type.filter(|_| self.content_type_attributes) {
            let mut attributes = Attributes::new();
            attributes.insert(Attribute::ContentType, content_type.into());
            options.attributes = attributes;
        }

        let size = content.len();
        cancellable("upload", cancel, async {
            self.store
                .put_opts(&path, PutPayload::from(content), options)
                .await?;
            Ok(())
        })
        .await?;

        tracing::debug!(%path, size, "object stored");
        self.locator(&path)
    }

    async fn delete(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        cancel: &CancellationToken,
    ) -> StorageResult<()> {
        let path = Self::object_path(bucket, key);

        cancellable("delete", cancel, async {
            match self.store.delete(&path).await {
                Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> (BucketName, ObjectKey) {
        (
            BucketName::new("products").unwrap(),
            ObjectKey::new("0191b7a4-3c1e-7b8e-9a55-6f1d2c3b4a59.png").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_upload_returns_locator_and_stores_content_type() {
        let backend = Arc::new(InMemory::new());
        let storage = ObjectStoreStorage::new(
            backend.clone(),
            Url::parse("https://cdn.example.com/assets").unwrap(),
        );
        let (bucket, key) = names();

        let locator = storage
            .upload(
                &bucket,
                &key,
                Bytes::from_static(b"\x89PNG\r\n\x1a\n"),
                Some("image/png".to_string()),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            locator.as_str(),
            "https://cdn.example.com/assets/products/0191b7a4-3c1e-7b8e-9a55-6f1d2c3b4a59.png"
        );

        let stored = backend
            .get(&ObjectPath::from(
                "products/0191b7a4-3c1e-7b8e-9a55-6f1d2c3b4a59.png",
            ))
            .await
            .unwrap();
        let content_type: Option<&str> = stored
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| value.as_ref());
        assert_eq!(content_type, Some("image/png"));
        assert_eq!(stored.bytes().await.unwrap().as_ref(), b"\x89PNG\r\n\x1a\n");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let storage = ObjectStoreStorage::in_memory().unwrap();
        let (bucket, key) = names();
        let cancel = CancellationToken::new();

        let locator = storage
            .upload(&bucket, &key, Bytes::from_static(b"GIF89a"), None, &cancel)
            .await
            .unwrap();
        assert_eq!(locator.scheme(), "memory");

        storage.delete(&bucket, &key, &cancel).await.unwrap();
        storage.delete(&bucket, &key, &cancel).await.unwrap();
    }

    #[tokio::test]
    async fn test_local_filesystem_round_trip() {
        let root = std::env::temp_dir().join(format!("catalog-{}", uuid::Uuid::new_v4()));
        let storage = ObjectStoreStorage::local(&root, None).unwrap();
        let (bucket, key) = names();
        let cancel = CancellationToken::new();

        let locator = storage
            .upload(
                &bucket,
                &key,
                Bytes::from_static(b"BM\x00\x00"),
                Some("image/bmp".to_string()),
                &cancel,
            )
            .await
            .unwrap();

        assert_eq!(locator.scheme(), "file");
        let file = locator.to_file_path().unwrap();
        assert_eq!(std::fs::read(&file).unwrap(), b"BM\x00\x00");

        storage.delete(&bucket, &key, &cancel).await.unwrap();
        assert!(!file.exists());
        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn test_cancelled_upload_is_reported() {
        let storage = ObjectStoreStorage::in_memory().unwrap();
        let (bucket, key) = names();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = storage
            .upload(&bucket, &key, Bytes::from_static(b"GIF89a"), None, &cancel)
            .await;

        assert!(matches!(result, Err(StorageError::Cancelled { .. })));
    }
}
