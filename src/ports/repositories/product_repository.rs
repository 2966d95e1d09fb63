use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use crate::domain::{
    errors::StorageResult,
    models::{PageRequest, PagedResult, Product, ProductCategory},
    value_objects::ProductId,
};

/// Filters and paging of a product query. Every supplied filter must match (AND).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub active: Option<bool>,
    /// Ignored when it is [`ProductCategory::Undefined`]
    pub category: Option<ProductCategory>,
    pub page: i64,
    pub page_size: i64,
}

impl ProductQuery {
    /// Paging with page >= 1 and a positive page size
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    /// Category filter that actually applies
    pub fn effective_category(&self) -> Option<ProductCategory> {
        self.category.filter(ProductCategory::is_defined)
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.min_price.is_none_or(|min| product.price() >= min)
            && self.max_price.is_none_or(|max| product.price() <= max)
            && self.active.is_none_or(|active| product.is_active() == active)
            && self
                .effective_category()
                .is_none_or(|category| product.category() == category)
    }
}

/// Persistence port for the product aggregate
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    async fn add(&self, product: &Product, cancel: &CancellationToken) -> StorageResult<()>;

    async fn get_by_id(
        &self,
        id: ProductId,
        cancel: &CancellationToken,
    ) -> StorageResult<Option<Product>>;

    async fn delete(&self, product: &Product, cancel: &CancellationToken) -> StorageResult<()>;

    async fn update(&self, product: &Product, cancel: &CancellationToken) -> StorageResult<()>;

    /// Filtered page ordered by id; the total counts all matches before paging
    async fn query(
        &self,
        query: &ProductQuery,
        cancel: &CancellationToken,
    ) -> StorageResult<PagedResult<Product>>;
}
