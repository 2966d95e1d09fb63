/// Errors raised by the persistence and object-storage ports
#[derive(Debug, Clone)]
pub enum StorageError {
    /// The caller's cancellation token fired before the operation completed
    Cancelled { operation: String },

    /// A stored record no longer satisfies the entity invariants
    CorruptRecord { id: String, reason: String },

    /// The storage backend returned a locator that is not an absolute URI
    InvalidLocator { locator: String },

    /// Infrastructure error with external source
    InfrastructureError {
        message: String,
        source: Option<String>, // Store error as string to allow Clone
    },

    /// Storage backend error
    StorageBackendError { message: String },
}

impl StorageError {
    pub fn cancelled(operation: impl Into<String>) -> Self {
        StorageError::Cancelled {
            operation: operation.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, StorageError::Cancelled { .. })
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Cancelled { operation } => {
                write!(f, "Operation '{}' was cancelled", operation)
            }
            StorageError::CorruptRecord { id, reason } => {
                write!(f, "Stored record '{}' is corrupt: {}", id, reason)
            }
            StorageError::InvalidLocator { locator } => {
                write!(f, "Storage returned an invalid locator: {}", locator)
            }
            StorageError::InfrastructureError { message, .. } => {
                write!(f, "Infrastructure error: {}", message)
            }
            StorageError::StorageBackendError { message } => {
                write!(f, "Storage backend error: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
