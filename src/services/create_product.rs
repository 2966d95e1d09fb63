use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use validator::Validate;

use super::validators::{
    validate_defined_category, validate_description_not_blank, validate_name_not_blank,
    validate_positive_price,
};
use crate::{
    domain::{
        models::{Product, ProductCategory},
        value_objects::ProductId,
    },
    pipeline::{Outcome, Request, RequestHandler},
    ports::ProductRepository,
};

#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductCommand {
    #[validate(
        length(max = 100, message = "Name must be at most 100 characters."),
        custom(function = "validate_name_not_blank")
    )]
    pub name: String,
    #[validate(
        length(max = 500, message = "Description must be at most 500 characters."),
        custom(function = "validate_description_not_blank")
    )]
    pub description: String,
    #[validate(custom(function = "validate_positive_price"))]
    pub price: Decimal,
    #[serde(default)]
    #[validate(custom(function = "validate_defined_category"))]
    pub category: ProductCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreateProductResponse {
    pub id: ProductId,
}

impl Request for CreateProductCommand {
    type Response = CreateProductResponse;
}

pub struct CreateProductHandler {
    repository: Arc<dyn ProductRepository>,
}

impl CreateProductHandler {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<CreateProductCommand> for CreateProductHandler {
    #[tracing::instrument(skip_all, fields(name = %request.name))]
    async fn handle(
        &self,
        request: CreateProductCommand,
        cancel: &CancellationToken,
    ) -> anyhow::Result<Outcome<CreateProductResponse>> {
        // Invalid input should have been rejected by validation already
        let product = Product::create(
            request.name,
            request.description,
            request.price,
            request.category,
        )?;

        self.repository.add(&product, cancel).await?;
        tracing::info!(id = %product.id(), "product created");

        Ok(Outcome::ok(CreateProductResponse { id: product.id() }))
    }
}
