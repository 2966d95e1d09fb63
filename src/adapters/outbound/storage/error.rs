use crate::domain::errors::StorageError;

/// Convert object_store errors to domain storage errors
impl From<object_store::Error> for StorageError {
    fn from(err: object_store::Error) -> Self {
        match err {
            object_store::Error::NotFound { path, source } => StorageError::StorageBackendError {
                message: format!("object not found at {}: {}", path, source),
            },
            object_store::Error::AlreadyExists { path, .. } => StorageError::StorageBackendError {
                message: format!("object already exists at {}", path),
            },
            other => StorageError::InfrastructureError {
                message: format!("Object store error: {}", other),
                source: Some(format!("{:?}", other)),
            },
        }
    }
}
