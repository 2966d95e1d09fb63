/// Invariant violations raised by entities and value objects.
///
/// These are programming-level faults: well-behaved callers validate input
/// before it reaches the domain, so a `DomainError` escaping a handler is
/// treated as an unexpected fault rather than a typed outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    // Product errors
    BlankProductName,
    ProductNameTooLong { actual: usize, max: usize },
    BlankProductDescription,
    ProductDescriptionTooLong { actual: usize, max: usize },
    NonPositivePrice,
    PriceTooPrecise { scale: u32, max: u32 },
    PriceTooLarge,
    UndefinedCategory,
    UnknownCategory(String),

    // ProductImage errors
    BlankImagePath,
    InvalidImageUri(String),

    // BucketName errors
    BucketNameTooShort { actual: usize, min: usize },
    BucketNameTooLong { actual: usize, max: usize },
    BucketNameInvalidCharacter(char),
    BucketNameInvalidEdge,

    // ObjectKey errors
    EmptyObjectKey,
    ObjectKeyTooLong { actual: usize, max: usize },
    InvalidObjectKeyCharacter(char),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::BlankProductName => write!(f, "Product name is required"),
            DomainError::ProductNameTooLong { actual, max } => {
                write!(
                    f,
                    "Product name too long: {} characters (max: {})",
                    actual, max
                )
            }
            DomainError::BlankProductDescription => {
                write!(f, "Product description is required")
            }
            DomainError::ProductDescriptionTooLong { actual, max } => {
                write!(
                    f,
                    "Product description too long: {} characters (max: {})",
                    actual, max
                )
            }
            DomainError::NonPositivePrice => {
                write!(f, "Product price must be greater than zero")
            }
            DomainError::PriceTooPrecise { scale, max } => {
                write!(
                    f,
                    "Product price has {} decimal places (max: {})",
                    scale, max
                )
            }
            DomainError::PriceTooLarge => {
                write!(f, "Product price must have at most 16 integer digits")
            }
            DomainError::UndefinedCategory => write!(f, "Product category is required"),
            DomainError::UnknownCategory(value) => {
                write!(f, "Unknown product category: '{}'", value)
            }

            DomainError::BlankImagePath => write!(f, "Image path cannot be empty"),
            DomainError::InvalidImageUri(value) => {
                write!(f, "Image path must be a valid absolute URI: '{}'", value)
            }

            DomainError::BucketNameTooShort { actual, min } => {
                write!(
                    f,
                    "Bucket name too short: {} characters (min: {})",
                    actual, min
                )
            }
            DomainError::BucketNameTooLong { actual, max } => {
                write!(
                    f,
                    "Bucket name too long: {} characters (max: {})",
                    actual, max
                )
            }
            DomainError::BucketNameInvalidCharacter(c) => {
                write!(
                    f,
                    "Invalid character in bucket name: '{}'. Only lowercase letters, numbers, and hyphens allowed",
                    c
                )
            }
            DomainError::BucketNameInvalidEdge => {
                write!(
                    f,
                    "Bucket name must start and end with a lowercase letter or number"
                )
            }

            DomainError::EmptyObjectKey => write!(f, "Object key cannot be empty"),
            DomainError::ObjectKeyTooLong { actual, max } => {
                write!(f, "Object key too long: {} bytes (max: {})", actual, max)
            }
            DomainError::InvalidObjectKeyCharacter(c) => {
                write!(f, "Invalid character in object key: {:?}", c)
            }
        }
    }
}

impl std::error::Error for DomainError {}
