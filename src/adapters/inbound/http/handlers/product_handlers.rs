use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    adapters::inbound::http::{
        middleware::RequestCancellation, responses::MalformedRequest, router::AppState,
    },
    domain::value_objects::ProductId,
    services::{
        CreateProductCommand, DeleteProductCommand, EditProductChanges, EditProductCommand,
        GetProductQuery, UploadProductImageCommand,
    },
};

/// Multipart field carrying the image
pub const IMAGE_FIELD: &str = "file";

/// Handle product creation
pub async fn create_product(
    State(state): State<AppState>,
    cancellation: RequestCancellation,
    body: Result<Json<CreateProductCommand>, JsonRejection>,
) -> Result<Response, MalformedRequest> {
    let Json(command) = body?;

    Ok(state
        .catalog
        .send(command, cancellation.token())
        .await
        .into_response())
}

/// Handle a single-product lookup (`?id=`) or a filtered, paged listing
pub async fn get_products(
    State(state): State<AppState>,
    cancellation: RequestCancellation,
    query: Result<Query<GetProductQuery>, QueryRejection>,
) -> Result<Response, MalformedRequest> {
    let Query(query) = query?;

    Ok(state
        .catalog
        .send(query, cancellation.token())
        .await
        .into_response())
}

/// Handle a partial product update
pub async fn edit_product(
    State(state): State<AppState>,
    cancellation: RequestCancellation,
    path: Result<Path<ProductId>, PathRejection>,
    body: Result<Json<EditProductChanges>, JsonRejection>,
) -> Result<Response, MalformedRequest> {
    let Path(id) = path?;
    let Json(changes) = body?;

    Ok(state
        .catalog
        .send(EditProductCommand::new(id, changes), cancellation.token())
        .await
        .into_response())
}

/// Handle product deletion
pub async fn delete_product(
    State(state): State<AppState>,
    cancellation: RequestCancellation,
    path: Result<Path<ProductId>, PathRejection>,
) -> Result<Response, MalformedRequest> {
    let Path(id) = path?;

    Ok(state
        .catalog
        .send(DeleteProductCommand { id }, cancellation.token())
        .await
        .into_response())
}

/// Handle an image upload; the first `file` part is used
pub async fn upload_product_image(
    State(state): State<AppState>,
    cancellation: RequestCancellation,
    path: Result<Path<ProductId>, PathRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, MalformedRequest> {
    let Path(id) = path?;
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content = field.bytes().await?;
        let command = UploadProductImageCommand {
            id,
            content,
            file_name,
        };

        return Ok(state
            .catalog
            .send(command, cancellation.token())
            .await
            .into_response());
    }

    Err(MalformedRequest::new(format!(
        "Multipart field '{IMAGE_FIELD}' is required"
    )))
}
