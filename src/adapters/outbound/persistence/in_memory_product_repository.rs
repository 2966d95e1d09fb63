use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::{
    adapters::outbound::cancellable,
    domain::{
        errors::{StorageError, StorageResult},
        models::{PagedResult, Product},
        value_objects::ProductId,
    },
    ports::repositories::{ProductQuery, ProductRepository},
};

/// In-memory implementation of ProductRepository for testing and development.
///
/// Products are kept ordered by id, so paging is deterministic.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<BTreeMap<ProductId, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn add(&self, product: &Product, cancel: &CancellationToken) -> StorageResult<()> {
        cancellable("add", cancel, async {
            let mut products = self.products.write().await;
            if products.contains_key(&product.id()) {
                return Err(StorageError::StorageBackendError {
                    message: format!("product {} already exists", product.id()),
                });
            }
            products.insert(product.id(), product.clone());
            Ok(())
        })
        .await
    }

    async fn get_by_id(
        &self,
        id: ProductId,
        cancel: &CancellationToken,
    ) -> StorageResult<Option<Product>> {
        cancellable("get_by_id", cancel, async {
            Ok(self.products.read().await.get(&id).cloned())
        })
        .await
    }

    async fn delete(&self, product: &Product, cancel: &CancellationToken) -> StorageResult<()> {
        cancellable("delete", cancel, async {
            self.products.write().await.remove(&product.id());
            Ok(())
        })
        .await
    }

    async fn update(&self, product: &Product, cancel: &CancellationToken) -> StorageResult<()> {
        cancellable("update", cancel, async {
            let mut products = self.products.write().await;
            match products.get_mut(&product.id()) {
                Some(stored) => {
                    *stored = product.clone();
                    Ok(())
                }
                None => Err(StorageError::StorageBackendError {
                    message: format!("product {} does not exist", product.id()),
                }),
            }
        })
        .await
    }

    async fn query(
        &self,
        query: &ProductQuery,
        cancel: &CancellationToken,
    ) -> StorageResult<PagedResult<Product>> {
        cancellable("query", cancel, async {
            let request = query.page_request();
            let products = self.products.read().await;

            let matching: Vec<&Product> = products
                .values()
                .filter(|product| query.matches(product))
                .collect();
            let total = matching.len() as u64;

            let items = matching
                .into_iter()
                .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
                .take(usize::try_from(request.limit()).unwrap_or(usize::MAX))
                .cloned()
                .collect();

            Ok(PagedResult::new(items, total, request))
        })
        .await
    }
}
