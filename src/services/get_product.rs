use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{
        models::{PagedResult, Product, ProductCategory, DEFAULT_PAGE_SIZE},
        value_objects::ProductId,
        CatalogError,
    },
    pipeline::{Outcome, Request, RequestHandler},
    ports::{ProductQuery, ProductRepository},
};

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    i64::from(DEFAULT_PAGE_SIZE)
}

/// Look up a single product by id, or list products matching the filters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProductQuery {
    pub id: Option<ProductId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub active: Option<bool>,
    pub category: Option<ProductCategory>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl Default for GetProductQuery {
    fn default() -> Self {
        Self {
            id: None,
            min_price: None,
            max_price: None,
            active: None,
            category: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl GetProductQuery {
    pub fn by_id(id: ProductId) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    /// Filters and paging handed to the repository unchanged
    pub fn to_product_query(&self) -> ProductQuery {
        ProductQuery {
            min_price: self.min_price,
            max_price: self.max_price,
            active: self.active,
            category: self.category,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

impl Request for GetProductQuery {
    type Response = PagedResult<Product>;
}

pub struct GetProductHandler {
    repository: Arc<dyn ProductRepository>,
}

impl GetProductHandler {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<GetProductQuery> for GetProductHandler {
    #[tracing::instrument(skip(self, cancel))]
    async fn handle(
        &self,
        request: GetProductQuery,
        cancel: &CancellationToken,
    ) -> anyhow::Result<Outcome<PagedResult<Product>>> {
        if let Some(id) = request.id {
            return Ok(match self.repository.get_by_id(id, cancel).await? {
                Some(product) => Outcome::ok(PagedResult::single(product)),
                None => Outcome::fail(CatalogError::not_found("Product")),
            });
        }

        let page = self
            .repository
            .query(&request.to_product_query(), cancel)
            .await?;

        Ok(Outcome::ok(page))
    }
}
