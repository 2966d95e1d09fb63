use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
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
        CatalogError,
    },
    pipeline::{Outcome, Request, RequestHandler},
    ports::ProductRepository,
};

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct EditProductCommand {
    pub id: ProductId,
    #[validate(
        length(max = 100, message = "Name must be at most 100 characters."),
        custom(function = "validate_name_not_blank")
    )]
    pub name: Option<String>,
    #[validate(
        length(max = 500, message = "Description must be at most 500 characters."),
        custom(function = "validate_description_not_blank")
    )]
    pub description: Option<String>,
    #[validate(custom(function = "validate_positive_price"))]
    pub price: Option<Decimal>,
    pub active: Option<bool>,
    #[validate(custom(function = "validate_defined_category"))]
    pub category: Option<ProductCategory>,
}

/// Body of an edit request; the id comes from the route
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub active: Option<bool>,
    pub category: Option<ProductCategory>,
}

impl EditProductCommand {
    pub fn new(id: ProductId, changes: EditProductChanges) -> Self {
        Self {
            id,
            name: changes.name,
            description: changes.description,
            price: changes.price,
            active: changes.active,
            category: changes.category,
        }
    }
}

impl Request for EditProductCommand {
    type Response = Product;
}

pub struct EditProductHandler {
    repository: Arc<dyn ProductRepository>,
}

impl EditProductHandler {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }
}

/// Apply every supplied field that differs from the current state.
/// Returns whether anything changed.
fn apply_changes(product: &mut Product, request: EditProductCommand) -> anyhow::Result<bool> {
    let mut changed = false;

    if let Some(name) = request.name.filter(|name| name != product.name()) {
        product.change_name(name)?;
        changed = true;
    }

    if let Some(description) = request
        .description
        .filter(|description| description != product.description())
    {
        product.change_description(description)?;
        changed = true;
    }

    if let Some(price) = request.price.filter(|price| *price != product.price()) {
        product.change_price(price)?;
        changed = true;
    }

    if let Some(category) = request
        .category
        .filter(|category| *category != product.category())
    {
        product.change_category(category)?;
        changed = true;
    }

    match request.active {
        Some(true) if !product.is_active() => {
            product.activate();
            changed = true;
        }
        Some(false) if product.is_active() => {
            product.deactivate();
            changed = true;
        }
        _ => {}
    }

    Ok(changed)
}

#[async_trait]
impl RequestHandler<EditProductCommand> for EditProductHandler {
    #[tracing::instrument(skip_all, fields(id = %request.id))]
    async fn handle(
        &self,
        request: EditProductCommand,
        cancel: &CancellationToken,
    ) -> anyhow::Result<Outcome<Product>> {
        let Some(mut product) = self.repository.get_by_id(request.id, cancel).await? else {
            return Ok(Outcome::fail(CatalogError::not_found("Product")));
        };

        // A rejected mutator aborts before anything is persisted
        if !apply_changes(&mut product, request)? {
            tracing::debug!("edit is a no-op");
            return Ok(Outcome::empty());
        }

        self.repository.update(&product, cancel).await?;

        Ok(Outcome::ok(product))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::DomainError, ports::MockProductRepository};

    fn stored() -> Product {
        Product::create(
            "Running shoes",
            "Lightweight trainers",
            Decimal::new(8900, 2),
            ProductCategory::Sports,
        )
        .unwrap()
    }

    fn repository_with(product: Product, updates: usize) -> MockProductRepository {
        let mut repository = MockProductRepository::new();
        repository
            .expect_get_by_id()
            .returning(move |_, _| Ok(Some(product.clone())));
        repository
            .expect_update()
            .times(updates)
            .returning(|_, _| Ok(()));
        repository
    }

    async fn run(
        repository: MockProductRepository,
        command: EditProductCommand,
    ) -> anyhow::Result<Outcome<Product>> {
        EditProductHandler::new(Arc::new(repository))
            .handle(command, &CancellationToken::new())
            .await
    }

    #[tokio::test]
    async fn test_no_fields_is_a_no_op() {
        let product = stored();
        let command = EditProductCommand::new(product.id(), EditProductChanges::default());

        let outcome = run(repository_with(product, 0), command).await.unwrap();

        assert_eq!(outcome, Outcome::empty());
    }

    #[tokio::test]
    async fn test_identical_values_are_a_no_op() {
        let product = stored();
        let command = EditProductCommand::new(
            product.id(),
            EditProductChanges {
                name: Some(product.name().to_string()),
                price: Some(product.price()),
                active: Some(true),
                category: Some(ProductCategory::Sports),
                ..Default::default()
            },
        );

        let outcome = run(repository_with(product, 0), command).await.unwrap();

        assert_eq!(outcome, Outcome::empty());
    }

    #[tokio::test]
    async fn test_changed_fields_update_once() {
        let product = stored();
        let command = EditProductCommand::new(
            product.id(),
            EditProductChanges {
                price: Some(Decimal::new(7900, 2)),
                active: Some(false),
                ..Default::default()
            },
        );

        let outcome = run(repository_with(product.clone(), 1), command)
            .await
            .unwrap();

        let updated = outcome.into_value().expect("updated product");
        assert_eq!(updated.id(), product.id());
        assert_eq!(updated.price(), Decimal::new(7900, 2));
        assert!(!updated.is_active());
        assert_eq!(updated.name(), product.name());
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let mut repository = MockProductRepository::new();
        repository.expect_get_by_id().returning(|_, _| Ok(None));
        repository.expect_update().never();

        let command = EditProductCommand::new(
            ProductId::generate(),
            EditProductChanges {
                name: Some("New name".to_string()),
                ..Default::default()
            },
        );
        let outcome = run(repository, command).await.unwrap();

        assert_eq!(outcome, Outcome::fail(CatalogError::not_found("Product")));
    }

    #[tokio::test]
    async fn test_rejected_mutation_aborts_before_persistence() {
        let product = stored();
        let command = EditProductCommand::new(
            product.id(),
            EditProductChanges {
                name: Some("Trail shoes".to_string()),
                category: Some(ProductCategory::Undefined),
                ..Default::default()
            },
        );

        let fault = run(repository_with(product, 0), command)
            .await
            .unwrap_err();

        assert_eq!(
            fault.downcast_ref::<DomainError>(),
            Some(&DomainError::UndefinedCategory)
        );
    }

    #[test]
    fn test_validation_only_checks_supplied_fields() {
        let id = ProductId::generate();
        assert!(EditProductCommand::new(id, EditProductChanges::default())
            .validate()
            .is_ok());

        let command = EditProductCommand::new(
            id,
            EditProductChanges {
                name: Some("".to_string()),
                price: Some(Decimal::ZERO),
                category: Some(ProductCategory::Undefined),
                ..Default::default()
            },
        );
        let errors = command.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("category"));
        assert!(!fields.contains_key("description"));
    }
}
