use std::collections::BTreeMap;

/// User-facing message of the generic failure outcome.
pub const UNKNOWN_ERROR_MESSAGE: &str = "unknown error";

/// Typed errors carried by a failed [`Outcome`](crate::pipeline::Outcome).
///
/// Each variant maps 1:1 to a transport status; see the HTTP adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The referenced resource does not exist
    #[error("{resource} was not found")]
    ResourceNotFound { resource: String },

    /// Domain policy rejected otherwise well-formed input
    #[error("{message}")]
    BusinessRule { message: String },

    /// Request failed field-level validation
    #[error("The request is invalid")]
    RequestValidation {
        fields: BTreeMap<String, Vec<String>>,
    },

    /// Generic failure; never carries fault detail
    #[error("{message}")]
    Unknown { message: String },
}

impl CatalogError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        CatalogError::ResourceNotFound {
            resource: resource.into(),
        }
    }

    pub fn business_rule(message: impl Into<String>) -> Self {
        CatalogError::BusinessRule {
            message: message.into(),
        }
    }

    pub fn unknown() -> Self {
        CatalogError::Unknown {
            message: UNKNOWN_ERROR_MESSAGE.to_string(),
        }
    }
}
