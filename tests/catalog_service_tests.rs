use bytes::Bytes;
use product_catalog::{
    create_in_memory_app, CatalogError, CreateProductCommand, EditProductChanges,
    EditProductCommand, GetProductQuery, Outcome, ProductCategory, UploadProductImageCommand,
};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

fn kettle() -> CreateProductCommand {
    CreateProductCommand {
        name: "Kettle".to_string(),
        description: "1.7 litre".to_string(),
        price: Decimal::new(2999, 2),
        category: ProductCategory::Home,
    }
}

#[tokio::test]
async fn test_product_lifecycle_through_the_service() {
    let catalog = create_in_memory_app().await.unwrap().catalog;
    let cancel = CancellationToken::new();

    let id = catalog
        .send(kettle(), cancel.clone())
        .await
        .into_value()
        .unwrap()
        .id;

    let edited = catalog
        .send(
            EditProductCommand::new(
                id,
                EditProductChanges {
                    category: Some(ProductCategory::Food),
                    ..Default::default()
                },
            ),
            cancel.clone(),
        )
        .await;
    assert_eq!(
        edited.value().map(|product| product.category()),
        Some(ProductCategory::Food)
    );

    let uploaded = catalog
        .send(
            UploadProductImageCommand {
                id,
                content: Bytes::from_static(b"GIF89a\x01\x00\x01\x00"),
                file_name: "kettle.gif".to_string(),
            },
            cancel.clone(),
        )
        .await;
    let image = uploaded
        .value()
        .and_then(|product| product.image())
        .map(|image| image.path().to_string())
        .unwrap();
    assert!(image.ends_with(".gif"));

    let page = catalog
        .send(GetProductQuery::by_id(id), cancel.clone())
        .await
        .into_value()
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].image().map(|i| i.path()), Some(image.as_str()));
}

#[tokio::test]
async fn test_cancelled_request_reports_generic_failure_and_persists_nothing() {
    let catalog = create_in_memory_app().await.unwrap().catalog;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = catalog.send(kettle(), cancel).await;
    assert_eq!(outcome, Outcome::fail(CatalogError::unknown()));

    let page = catalog
        .send(GetProductQuery::default(), CancellationToken::new())
        .await
        .into_value()
        .unwrap();
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn test_validation_runs_before_the_handler() {
    let catalog = create_in_memory_app().await.unwrap().catalog;

    let outcome = catalog
        .send(
            CreateProductCommand {
                price: Decimal::ZERO,
                ..kettle()
            },
            CancellationToken::new(),
        )
        .await;

    match outcome.first_error() {
        Some(CatalogError::RequestValidation { fields }) => {
            assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["price"]);
        }
        other => panic!("expected a validation failure, got {other:?}"),
    }

    let page = catalog
        .send(GetProductQuery::default(), CancellationToken::new())
        .await
        .into_value()
        .unwrap();
    assert!(page.items.is_empty());
}
