use std::{
    collections::BTreeMap,
    marker::PhantomData,
    sync::Arc,
    task::{Context, Poll},
};

use async_trait::async_trait;
use futures::future::{join_all, BoxFuture};
use tokio_util::sync::CancellationToken;
use tower::{Layer, Service};
use tracing::debug;

use super::{Envelope, Outcome, Request};
use crate::domain::CatalogError;

/// A single field-level validation message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validates one request type. An empty result means the request is valid.
#[async_trait]
pub trait Validator<R>: Send + Sync + 'static {
    async fn validate(&self, request: &R, cancel: &CancellationToken) -> Vec<FieldError>;
}

/// Adapts a `#[derive(Validate)]` request to the [`Validator`] contract
pub struct DeclarativeValidator<R> {
    _request: PhantomData<fn() -> R>,
}

impl<R> DeclarativeValidator<R> {
    pub fn new() -> Self {
        Self {
            _request: PhantomData,
        }
    }
}

impl<R> Default for DeclarativeValidator<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R> Validator<R> for DeclarativeValidator<R>
where
    R: validator::Validate + Send + Sync + 'static,
{
    async fn validate(&self, request: &R, _cancel: &CancellationToken) -> Vec<FieldError> {
        let Err(errors) = request.validate() else {
            return Vec::new();
        };

        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        fields
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    FieldError::new(field.as_ref(), message)
                })
            })
            .collect()
    }
}

/// Merge validator results into a field -> messages map, keeping encounter order per field
pub fn merge_field_errors(
    results: impl IntoIterator<Item = Vec<FieldError>>,
) -> BTreeMap<String, Vec<String>> {
    let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for error in results.into_iter().flatten() {
        fields.entry(error.field).or_default().push(error.message);
    }
    fields
}

/// Layer running every registered validator before the inner service
pub struct ValidationLayer<R> {
    validators: Arc<Vec<Arc<dyn Validator<R>>>>,
}

impl<R> ValidationLayer<R> {
    pub fn new(validators: Vec<Arc<dyn Validator<R>>>) -> Self {
        Self {
            validators: Arc::new(validators),
        }
    }
}

impl<R> Clone for ValidationLayer<R> {
    fn clone(&self) -> Self {
        Self {
            validators: self.validators.clone(),
        }
    }
}

impl<S, R> Layer<S> for ValidationLayer<R> {
    type Service = ValidationService<S, R>;

    fn layer(&self, inner: S) -> Self::Service {
        ValidationService {
            inner,
            validators: self.validators.clone(),
        }
    }
}

/// Runs validators concurrently and short-circuits with a
/// [`CatalogError::RequestValidation`] outcome when any of them reports an error
pub struct ValidationService<S, R> {
    inner: S,
    validators: Arc<Vec<Arc<dyn Validator<R>>>>,
}

impl<S: Clone, R> Clone for ValidationService<S, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            validators: self.validators.clone(),
        }
    }
}

impl<S, R> Service<Envelope<R>> for ValidationService<S, R>
where
    R: Request,
    S: Service<Envelope<R>, Response = Outcome<R::Response>> + Clone + Send + 'static,
    S::Error: Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, envelope: Envelope<R>) -> Self::Future {
        // The readied service is the one that must be called
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        if self.validators.is_empty() {
            return Box::pin(inner.call(envelope));
        }

        let validators = self.validators.clone();

        Box::pin(async move {
            let results = join_all(
                validators
                    .iter()
                    .map(|validator| validator.validate(&envelope.request, &envelope.cancel)),
            )
            .await;

            let fields = merge_field_errors(results);
            if !fields.is_empty() {
                debug!(
                    request = std::any::type_name::<R>(),
                    ?fields,
                    "request rejected by validation"
                );
                return Ok(Outcome::fail(CatalogError::RequestValidation { fields }));
            }

            inner.call(envelope).await
        })
    }
}
