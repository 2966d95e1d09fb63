pub mod errors;
pub mod models;
pub mod value_objects;

// Re-export commonly used types
pub use errors::{CatalogError, DomainError, StorageError, StorageResult, UNKNOWN_ERROR_MESSAGE};
pub use models::*;
pub use value_objects::*;
