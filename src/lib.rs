pub mod adapters;
pub mod app;
pub mod domain;
pub mod pipeline;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - core business entities and value objects
pub use domain::{
    // Errors
    CatalogError,
    DomainError,
    // Value objects
    ImageFormat,
    // Models
    PagedResult,
    Product,
    ProductCategory,
    ProductId,
    ProductImage,
    StorageError,
};

// Request pipeline
pub use pipeline::{Outcome, Pipeline, Request, RequestHandler, Validator};

// Port types - interfaces for external systems
pub use ports::{ObjectStorage, ProductQuery, ProductRepository};

// Use cases
pub use services::{
    CatalogService, CreateProductCommand, CreateProductResponse, DeleteProductCommand,
    EditProductChanges, EditProductCommand, GetProductQuery, UploadProductImageCommand,
};

// Application factory and configuration
pub use app::{
    create_app_from_env, create_in_memory_app, AppBuilder, AppConfig, AppDependencies, AppError,
    AppServices, RepositoryBackend, StorageBackend,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::{
    persistence::{InMemoryProductRepository, PostgresProductRepository},
    storage::ObjectStoreStorage,
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        adapters::inbound::http::{create_router, AppState},
        create_in_memory_app, AppBuilder, AppServices, CatalogService, CreateProductCommand,
        EditProductChanges, GetProductQuery, Outcome, Product, ProductCategory, ProductId,
    };
}
