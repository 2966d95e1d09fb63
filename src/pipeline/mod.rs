//! Request pipeline: every use case is executed as
//! `validation -> exception guard -> handler`, composed from tower layers.

mod exception_guard;
mod outcome;
mod request;
mod validation;

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use tower::{ServiceBuilder, ServiceExt};

pub use exception_guard::{ExceptionGuardLayer, ExceptionGuardService};
pub use outcome::{Failure, Outcome};
pub use request::{Envelope, HandlerService, Request, RequestCancelled, RequestHandler};
pub use validation::{
    merge_field_errors, DeclarativeValidator, FieldError, ValidationLayer, ValidationService,
    Validator,
};

type BoxedCall<R> =
    Arc<dyn Fn(Envelope<R>) -> BoxFuture<'static, Outcome<<R as Request>::Response>> + Send + Sync>;

/// The composed, type-erased stack for one request type
pub struct Pipeline<R: Request> {
    call: BoxedCall<R>,
}

impl<R: Request> Clone for Pipeline<R> {
    fn clone(&self) -> Self {
        Self {
            call: self.call.clone(),
        }
    }
}

impl<R: Request> Pipeline<R> {
    pub fn builder(handler: Arc<dyn RequestHandler<R>>) -> PipelineBuilder<R> {
        PipelineBuilder {
            handler,
            validators: Vec::new(),
        }
    }

    /// Run a request through every stage. Never fails: faults become the
    /// generic failure outcome.
    pub async fn send(&self, request: R, cancel: CancellationToken) -> Outcome<R::Response> {
        (self.call)(Envelope::new(request, cancel)).await
    }
}

pub struct PipelineBuilder<R: Request> {
    handler: Arc<dyn RequestHandler<R>>,
    validators: Vec<Arc<dyn Validator<R>>>,
}

impl<R: Request> PipelineBuilder<R> {
    /// Register a validator; validators run concurrently in the validation stage
    pub fn validator(mut self, validator: Arc<dyn Validator<R>>) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn build(self) -> Pipeline<R> {
        let service = ServiceBuilder::new()
            .layer(ValidationLayer::new(self.validators))
            .layer(ExceptionGuardLayer::new())
            .service(HandlerService::new(self.handler));

        let call: BoxedCall<R> = Arc::new(move |envelope: Envelope<R>| {
            let service = service.clone();
            Box::pin(async move {
                match service.oneshot(envelope).await {
                    Ok(outcome) => outcome,
                    Err(never) => match never {},
                }
            }) as BoxFuture<'static, Outcome<R::Response>>
        });

        Pipeline { call }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::{CatalogError, UNKNOWN_ERROR_MESSAGE};

    struct Divide {
        numerator: i64,
        denominator: i64,
    }

    impl Request for Divide {
        type Response = i64;
    }

    #[derive(Default)]
    struct Divider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RequestHandler<Divide> for Divider {
        async fn handle(
            &self,
            request: Divide,
            _cancel: &CancellationToken,
        ) -> anyhow::Result<Outcome<i64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if request.numerator < 0 {
                anyhow::bail!("negative numerator {}", request.numerator);
            }
            Ok(Outcome::ok(request.numerator / request.denominator))
        }
    }

    struct NonZeroDenominator;

    #[async_trait]
    impl Validator<Divide> for NonZeroDenominator {
        async fn validate(&self, request: &Divide, _: &CancellationToken) -> Vec<FieldError> {
            if request.denominator == 0 {
                vec![FieldError::new("denominator", "must not be zero")]
            } else {
                Vec::new()
            }
        }
    }

    fn pipeline(handler: Arc<Divider>) -> Pipeline<Divide> {
        Pipeline::<Divide>::builder(handler)
            .validator(Arc::new(NonZeroDenominator))
            .build()
    }

    #[tokio::test]
    async fn test_valid_request_reaches_handler() {
        let handler = Arc::new(Divider::default());
        let outcome = pipeline(handler.clone())
            .send(
                Divide {
                    numerator: 9,
                    denominator: 3,
                },
                CancellationToken::new(),
            )
            .await;

        assert_eq!(outcome, Outcome::ok(3));
        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_validation_short_circuits_before_guard() {
        let handler = Arc::new(Divider::default());
        let outcome = pipeline(handler.clone())
            .send(
                Divide {
                    numerator: 1,
                    denominator: 0,
                },
                CancellationToken::new(),
            )
            .await;

        assert!(matches!(
            outcome.first_error(),
            Some(CatalogError::RequestValidation { fields }) if fields["denominator"] == vec!["must not be zero"]
        ));
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handler_fault_is_hidden() {
        let p = pipeline(Arc::new(Divider::default()));
        let outcome = p
            .send(
                Divide {
                    numerator: -4,
                    denominator: 2,
                },
                CancellationToken::new(),
            )
            .await;

        assert_eq!(
            outcome.first_error().map(ToString::to_string).as_deref(),
            Some(UNKNOWN_ERROR_MESSAGE)
        );

        // Pipeline is reusable after a fault
        let again = p
            .send(
                Divide {
                    numerator: 4,
                    denominator: 2,
                },
                CancellationToken::new(),
            )
            .await;
        assert_eq!(again, Outcome::ok(2));
    }
}
