use uuid::Uuid;

use crate::domain::errors::DomainError;

const MAX_KEY_LEN: usize = 1024;
const MAX_EXTENSION_LEN: usize = 16;

/// A validated object key within a bucket.
///
/// Keys are a single path segment; the bucket supplies the prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Create a new ObjectKey with validation
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::EmptyObjectKey);
        }

        if value.len() > MAX_KEY_LEN {
            return Err(DomainError::ObjectKeyTooLong {
                actual: value.len(),
                max: MAX_KEY_LEN,
            });
        }

        if let Some(c) = value
            .chars()
            .find(|c| *c == '/' || *c == '\\' || c.is_control())
        {
            return Err(DomainError::InvalidObjectKeyCharacter(c));
        }

        Ok(Self(value))
    }

    /// Fresh random key that keeps the extension of `file_name`, e.g.
    /// `photo.JPG` -> `3f2c...-....JPG`.
    ///
    /// Only short ASCII alphanumeric extensions are kept; anything else is
    /// dropped and the key is the bare UUID.
    pub fn random_with_extension_of(file_name: &str) -> Self {
        let extension = std::path::Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| {
                !ext.is_empty()
                    && ext.len() <= MAX_EXTENSION_LEN
                    && ext.chars().all(|c| c.is_ascii_alphanumeric())
            })
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        Self(format!("{}{}", Uuid::new_v4(), extension))
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extension including the leading dot, if any
    pub fn extension(&self) -> Option<&str> {
        self.0.rfind('.').map(|idx| &self.0[idx..])
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
