use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{
    CreateProductCommand, CreateProductHandler, DeleteProductCommand, DeleteProductHandler,
    EditProductCommand, EditProductHandler, GetProductHandler, GetProductQuery,
    UploadProductImageCommand, UploadProductImageHandler,
};
use crate::{
    pipeline::{DeclarativeValidator, Outcome, Pipeline, Request},
    ports::{ObjectStorage, ProductRepository},
};

/// Resolves the pipeline registered for a request type
pub trait Dispatch<R: Request> {
    fn pipeline(&self) -> &Pipeline<R>;
}

/// Entry point of the catalog: one pipeline per use case
#[derive(Clone)]
pub struct CatalogService {
    create: Pipeline<CreateProductCommand>,
    edit: Pipeline<EditProductCommand>,
    delete: Pipeline<DeleteProductCommand>,
    get: Pipeline<GetProductQuery>,
    upload_image: Pipeline<UploadProductImageCommand>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn ProductRepository>, storage: Arc<dyn ObjectStorage>) -> Self {
        let create = Pipeline::<CreateProductCommand>::builder(Arc::new(
            CreateProductHandler::new(repository.clone()),
        ))
        .validator(Arc::new(DeclarativeValidator::<CreateProductCommand>::new()))
        .build();

        let edit = Pipeline::<EditProductCommand>::builder(Arc::new(EditProductHandler::new(
            repository.clone(),
        )))
        .validator(Arc::new(DeclarativeValidator::<EditProductCommand>::new()))
        .build();

        let delete = Pipeline::<DeleteProductCommand>::builder(Arc::new(
            DeleteProductHandler::new(repository.clone()),
        ))
        .build();

        let get = Pipeline::<GetProductQuery>::builder(Arc::new(GetProductHandler::new(
            repository.clone(),
        )))
        .build();

        let upload_image = Pipeline::<UploadProductImageCommand>::builder(Arc::new(
            UploadProductImageHandler::new(repository, storage),
        ))
        .build();

        Self {
            create,
            edit,
            delete,
            get,
            upload_image,
        }
    }

    /// Run `request` through its pipeline
    pub async fn send<R>(&self, request: R, cancel: CancellationToken) -> Outcome<R::Response>
    where
        R: Request,
        Self: Dispatch<R>,
    {
        Dispatch::<R>::pipeline(self).send(request, cancel).await
    }
}

macro_rules! dispatch {
    ($($request:ty => $field:ident),* $(,)?) => {
        $(
            impl Dispatch<$request> for CatalogService {
                fn pipeline(&self) -> &Pipeline<$request> {
                    &self.$field
                }
            }
        )*
    };
}

dispatch! {
    CreateProductCommand => create,
    EditProductCommand => edit,
    DeleteProductCommand => delete,
    GetProductQuery => get,
    UploadProductImageCommand => upload_image,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::{
        domain::{
            models::ProductCategory, CatalogError, ProductId, StorageError, UNKNOWN_ERROR_MESSAGE,
        },
        ports::{MockObjectStorage, MockProductRepository},
    };

    #[tokio::test]
    async fn test_requests_are_routed_through_validation() {
        let mut repository = MockProductRepository::new();
        repository.expect_add().never();

        let catalog = CatalogService::new(Arc::new(repository), Arc::new(MockObjectStorage::new()));
        let outcome = catalog
            .send(
                CreateProductCommand {
                    name: String::new(),
                    description: "desc".to_string(),
                    price: Decimal::ONE,
                    category: ProductCategory::Toys,
                },
                CancellationToken::new(),
            )
            .await;

        assert!(matches!(
            outcome.first_error(),
            Some(CatalogError::RequestValidation { fields }) if fields.contains_key("name")
        ));
    }

    #[tokio::test]
    async fn test_repository_faults_surface_as_generic_failure() {
        let mut repository = MockProductRepository::new();
        repository.expect_get_by_id().returning(|_, _| {
            Err(StorageError::StorageBackendError {
                message: "pool timed out".to_string(),
            })
        });

        let catalog = CatalogService::new(Arc::new(repository), Arc::new(MockObjectStorage::new()));
        let outcome = catalog
            .send(
                DeleteProductCommand {
                    id: ProductId::generate(),
                },
                CancellationToken::new(),
            )
            .await;

        assert_eq!(
            outcome.first_error().map(ToString::to_string).as_deref(),
            Some(UNKNOWN_ERROR_MESSAGE)
        );
    }
}
