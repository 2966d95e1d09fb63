use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{
        models::Product,
        value_objects::{BucketName, ImageFormat, ObjectKey, ProductId, ProductImage},
        CatalogError,
    },
    pipeline::{Outcome, Request, RequestHandler},
    ports::{ObjectStorage, ProductRepository},
};

/// Largest accepted image, in bytes
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Bucket every product image is stored under
pub const PRODUCT_IMAGE_BUCKET: &str = "products";

pub const EMPTY_FILE_MESSAGE: &str = "File is empty or invalid.";
pub const FILE_TOO_LARGE_MESSAGE: &str = "File must be at most 10 MB.";
pub const NOT_AN_IMAGE_MESSAGE: &str =
    "File must be a valid image (jpg, png, gif, bmp, webp, tiff).";

#[derive(Debug, Clone, PartialEq)]
pub struct UploadProductImageCommand {
    pub id: ProductId,
    pub content: Bytes,
    pub file_name: String,
}

impl Request for UploadProductImageCommand {
    type Response = Product;
}

pub struct UploadProductImageHandler {
    repository: Arc<dyn ProductRepository>,
    storage: Arc<dyn ObjectStorage>,
}

impl UploadProductImageHandler {
    pub fn new(repository: Arc<dyn ProductRepository>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            repository,
            storage,
        }
    }
}

/// Business checks on the uploaded bytes, in order of precedence
fn check_content(content: &[u8]) -> Result<ImageFormat, CatalogError> {
    if content.is_empty() {
        return Err(CatalogError::business_rule(EMPTY_FILE_MESSAGE));
    }
    if content.len() > MAX_IMAGE_BYTES {
        return Err(CatalogError::business_rule(FILE_TOO_LARGE_MESSAGE));
    }
    ImageFormat::sniff(content).ok_or_else(|| CatalogError::business_rule(NOT_AN_IMAGE_MESSAGE))
}

#[async_trait]
impl RequestHandler<UploadProductImageCommand> for UploadProductImageHandler {
    #[tracing::instrument(
        skip_all,
        fields(id = %request.id, file_name = %request.file_name, size = request.content.len())
    )]
    async fn handle(
        &self,
        request: UploadProductImageCommand,
        cancel: &CancellationToken,
    ) -> anyhow::Result<Outcome<Product>> {
        let Some(mut product) = self.repository.get_by_id(request.id, cancel).await? else {
            return Ok(Outcome::fail(CatalogError::not_found("Product")));
        };

        let format = match check_content(&request.content) {
            Ok(format) => format,
            Err(rejection) => return Ok(Outcome::fail(rejection)),
        };

        let bucket = BucketName::new(PRODUCT_IMAGE_BUCKET)?;
        let key = ObjectKey::random_with_extension_of(&request.file_name);

        let locator = self
            .storage
            .upload(
                &bucket,
                &key,
                request.content,
                Some(format.mime_type().to_string()),
                cancel,
            )
            .await?;

        let orphan = OrphanedImage::new(Arc::clone(&self.storage), bucket, key);

        product.change_image(ProductImage::try_from(&locator)?);

        if let Err(error) = self.repository.update(&product, cancel).await {
            orphan.remove().await;
            return Err(error.into());
        }
        orphan.disarm();

        tracing::info!(%locator, "product image stored");
        Ok(Outcome::ok(product))
    }
}

/// An uploaded object that no product points to yet.
///
/// Dropping it while armed removes the object in the background, which covers
/// a handler future dropped by cancellation between upload and update.
struct OrphanedImage {
    storage: Arc<dyn ObjectStorage>,
    bucket: BucketName,
    key: ObjectKey,
    armed: bool,
}

impl OrphanedImage {
    fn new(storage: Arc<dyn ObjectStorage>, bucket: BucketName, key: ObjectKey) -> Self {
        Self {
            storage,
            bucket,
            key,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }

    async fn remove(mut self) {
        self.armed = false;
        remove_orphan(
            Arc::clone(&self.storage),
            self.bucket.clone(),
            self.key.clone(),
        )
        .await;
    }
}

impl Drop for OrphanedImage {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(remove_orphan(
                    Arc::clone(&self.storage),
                    self.bucket.clone(),
                    self.key.clone(),
                ));
            }
            Err(_) => tracing::warn!(
                bucket = %self.bucket,
                key = %self.key,
                "no runtime left to remove orphaned product image"
            ),
        }
    }
}

/// Best effort; the request token may already be cancelled, so a fresh one is used
async fn remove_orphan(storage: Arc<dyn ObjectStorage>, bucket: BucketName, key: ObjectKey) {
    let cleanup = CancellationToken::new();
    if let Err(error) = storage.delete(&bucket, &key, &cleanup).await {
        tracing::warn!(
            %bucket,
            %key,
            error = %error,
            "failed to remove orphaned product image"
        );
    }
}
