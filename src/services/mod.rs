mod catalog_service;
mod create_product;
mod delete_product;
mod edit_product;
mod get_product;
mod upload_product_image;
mod validators;

pub use catalog_service::{CatalogService, Dispatch};
pub use create_product::{CreateProductCommand, CreateProductHandler, CreateProductResponse};
pub use delete_product::{DeleteProductCommand, DeleteProductHandler};
pub use edit_product::{EditProductChanges, EditProductCommand, EditProductHandler};
pub use get_product::{GetProductHandler, GetProductQuery};
pub use upload_product_image::{
    UploadProductImageCommand, UploadProductImageHandler, EMPTY_FILE_MESSAGE,
    FILE_TOO_LARGE_MESSAGE, MAX_IMAGE_BYTES, NOT_AN_IMAGE_MESSAGE, PRODUCT_IMAGE_BUCKET,
};
