use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{value_objects::ProductId, CatalogError},
    pipeline::{Outcome, Request, RequestHandler},
    ports::ProductRepository,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DeleteProductCommand {
    pub id: ProductId,
}

impl Request for DeleteProductCommand {
    type Response = ();
}

pub struct DeleteProductHandler {
    repository: Arc<dyn ProductRepository>,
}

impl DeleteProductHandler {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<DeleteProductCommand> for DeleteProductHandler {
    #[tracing::instrument(skip(self, cancel))]
    async fn handle(
        &self,
        request: DeleteProductCommand,
        cancel: &CancellationToken,
    ) -> anyhow::Result<Outcome<()>> {
        let Some(product) = self.repository.get_by_id(request.id, cancel).await? else {
            return Ok(Outcome::fail(CatalogError::not_found("Product")));
        };

        self.repository.delete(&product, cancel).await?;
        tracing::info!(id = %request.id, "product deleted");

        Ok(Outcome::empty())
    }
}
