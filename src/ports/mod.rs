pub mod repositories;
pub mod storage;

// Re-export all port traits for convenience
pub use repositories::{ProductQuery, ProductRepository};
pub use storage::ObjectStorage;

#[cfg(test)]
pub use repositories::MockProductRepository;
#[cfg(test)]
pub use storage::MockObjectStorage;
