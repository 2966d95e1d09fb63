// Infrastructure error conversion
mod error;

mod object_store_storage;
mod s3;

pub use object_store_storage::{ObjectStoreStorage, IN_MEMORY_BASE_URL};
pub use s3::{create_s3_store, default_public_base_url, S3Config};
