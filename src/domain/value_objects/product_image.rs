use serde::Serialize;
use url::Url;

use crate::domain::errors::DomainError;

/// Reference to a product image: an absolute URI returned by the storage port
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductImage(String);

impl ProductImage {
    /// Create a new ProductImage, rejecting blank or relative paths
    pub fn new(path: impl Into<String>) -> Result<Self, DomainError> {
        let path = path.into();

        if path.trim().is_empty() {
            return Err(DomainError::BlankImagePath);
        }

        // Url::parse only accepts absolute URLs
        if Url::parse(&path).is_err() {
            return Err(DomainError::InvalidImageUri(path));
        }

        Ok(Self(path))
    }

    pub fn path(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&Url> for ProductImage {
    type Error = DomainError;

    fn try_from(url: &Url) -> Result<Self, Self::Error> {
        ProductImage::new(url.as_str())
    }
}

impl std::fmt::Display for ProductImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
