use crate::domain::CatalogError;

/// Non-empty, ordered list of errors carried by a failed [`Outcome`].
///
/// Only the first error is ever surfaced to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    first: CatalogError,
    rest: Vec<CatalogError>,
}

impl Failure {
    pub fn new(first: CatalogError) -> Self {
        Self {
            first,
            rest: Vec::new(),
        }
    }

    pub fn with_error(mut self, error: CatalogError) -> Self {
        self.rest.push(error);
        self
    }

    pub fn first(&self) -> &CatalogError {
        &self.first
    }

    pub fn errors(&self) -> impl Iterator<Item = &CatalogError> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }

    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }
}

/// Structured result of a use case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(Option<T>),
    Failure(Failure),
}

impl<T> Outcome<T> {
    pub fn ok(value: T) -> Self {
        Outcome::Success(Some(value))
    }

    /// Success without a value
    pub fn empty() -> Self {
        Outcome::Success(None)
    }

    pub fn fail(error: CatalogError) -> Self {
        Outcome::Failure(Failure::new(error))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Success(value) => value.as_ref(),
            Outcome::Failure(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Success(value) => value,
            Outcome::Failure(_) => None,
        }
    }

    pub fn first_error(&self) -> Option<&CatalogError> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(failure) => Some(failure.first()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(value.map(f)),
            Outcome::Failure(failure) => Outcome::Failure(failure),
        }
    }
}

impl<T> From<CatalogError> for Outcome<T> {
    fn from(error: CatalogError) -> Self {
        Outcome::fail(error)
    }
}

impl<T> From<Failure> for Outcome<T> {
    fn from(failure: Failure) -> Self {
        Outcome::Failure(failure)
    }
}
