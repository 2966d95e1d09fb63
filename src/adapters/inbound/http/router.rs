use axum::{
    extract::DefaultBodyLimit,
    routing::{post, put},
    Router,
};
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use super::handlers::{
    create_product, delete_product, edit_product, get_products, upload_product_image,
};
use crate::services::CatalogService;

/// Transport-level cap on upload bodies; the image size rule is enforced by
/// the upload use case
pub const MAX_UPLOAD_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
}

impl AppState {
    pub fn new(catalog: CatalogService) -> Self {
        Self { catalog }
    }
}

/// Create the product API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/products", post(create_product).get(get_products))
        .route("/products/{id}", put(edit_product).delete(delete_product))
        .route(
            "/products/{id}/image",
            post(upload_product_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Same as [`create_router`], aborting requests that run longer than `timeout`.
///
/// An aborted request drops its handler, which cancels the request's token.
pub fn create_router_with_timeout(state: AppState, timeout: Duration) -> Router {
    create_router(state).layer(TimeoutLayer::new(timeout))
}
