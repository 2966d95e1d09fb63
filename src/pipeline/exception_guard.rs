use std::{
    any::Any,
    convert::Infallible,
    panic::AssertUnwindSafe,
    task::{Context, Poll},
};

use futures::{future::BoxFuture, FutureExt};
use tower::{Layer, Service, ServiceExt};
use tracing::{error, warn};

use super::{Envelope, Outcome, Request, RequestCancelled};
use crate::domain::{CatalogError, StorageError};

/// Layer converting every fault of the inner service into the generic failure outcome
#[derive(Debug, Clone, Copy, Default)]
pub struct ExceptionGuardLayer;

impl ExceptionGuardLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for ExceptionGuardLayer {
    type Service = ExceptionGuardService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ExceptionGuardService { inner }
    }
}

/// Catches errors and panics raised while producing an outcome.
///
/// The fault is logged with full detail; the caller only ever sees
/// [`CatalogError::unknown`].
#[derive(Clone)]
pub struct ExceptionGuardService<S> {
    inner: S,
}

impl<S, R> Service<Envelope<R>> for ExceptionGuardService<S>
where
    R: Request,
    S: Service<Envelope<R>, Response = Outcome<R::Response>, Error = anyhow::Error>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
{
    type Response = Outcome<R::Response>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // Readiness errors of the inner service are faults too; they are
        // observed inside `call`
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, envelope: Envelope<R>) -> Self::Future {
        let clone = self.inner.clone();
        let inner = std::mem::replace(&mut self.inner, clone);
        let request = std::any::type_name::<R>();

        Box::pin(async move {
            let outcome = AssertUnwindSafe(inner.oneshot(envelope))
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(outcome)) => Ok(outcome),
                Ok(Err(fault)) => {
                    if is_cancellation(&fault) {
                        warn!(request, "request cancelled: {:#}", fault);
                    } else {
                        error!(request, error = ?fault, "unhandled fault while handling request");
                    }
                    Ok(Outcome::fail(CatalogError::unknown()))
                }
                Err(panic) => {
                    error!(
                        request,
                        panic = panic_message(panic.as_ref()),
                        "handler panicked while handling request"
                    );
                    Ok(Outcome::fail(CatalogError::unknown()))
                }
            }
        })
    }
}

fn is_cancellation(fault: &anyhow::Error) -> bool {
    fault.chain().any(|cause| {
        cause.is::<RequestCancelled>()
            || cause
                .downcast_ref::<StorageError>()
                .is_some_and(StorageError::is_cancelled)
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    use crate::{
        domain::UNKNOWN_ERROR_MESSAGE,
        pipeline::{HandlerService, RequestHandler},
    };

    struct Ping;

    impl Request for Ping {
        type Response = &'static str;
    }

    enum Behaviour {
        Pong,
        Fault,
        Panic,
        CancelledStorage,
        Hang,
    }

    #[async_trait]
    impl RequestHandler<Ping> for Behaviour {
        async fn handle(
            &self,
            _request: Ping,
            _cancel: &CancellationToken,
        ) -> anyhow::Result<Outcome<&'static str>> {
            match self {
                Behaviour::Pong => Ok(Outcome::ok("pong")),
                Behaviour::Fault => anyhow::bail!("connection refused: db-primary:5432"),
                Behaviour::Panic => panic!("index out of bounds"),
                Behaviour::CancelledStorage => Err(StorageError::cancelled("get_by_id").into()),
                Behaviour::Hang => futures::future::pending().await,
            }
        }
    }

    async fn run(behaviour: Behaviour, cancel: CancellationToken) -> Outcome<&'static str> {
        let handler = HandlerService::<Ping>::new(Arc::new(behaviour));
        let service = ExceptionGuardLayer::new().layer(handler);
        match service.oneshot(Envelope::new(Ping, cancel)).await {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        }
    }

    fn assert_generic_failure(outcome: &Outcome<&'static str>) {
        match outcome.first_error() {
            Some(CatalogError::Unknown { message }) => {
                assert_eq!(message, UNKNOWN_ERROR_MESSAGE)
            }
            other => panic!("expected the generic failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let outcome = run(Behaviour::Pong, CancellationToken::new()).await;
        assert_eq!(outcome, Outcome::ok("pong"));
    }

    #[tokio::test]
    async fn test_fault_becomes_generic_failure() {
        let outcome = run(Behaviour::Fault, CancellationToken::new()).await;
        assert_generic_failure(&outcome);
        let text = format!("{outcome:?}");
        assert!(!text.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_panic_becomes_generic_failure() {
        let outcome = run(Behaviour::Panic, CancellationToken::new()).await;
        assert_generic_failure(&outcome);
    }

    #[tokio::test]
    async fn test_cancellation_becomes_generic_failure() {
        let outcome = run(Behaviour::CancelledStorage, CancellationToken::new()).await;
        assert_generic_failure(&outcome);

        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = run(Behaviour::Hang, cancel).await;
        assert_generic_failure(&outcome);
    }

    #[test]
    fn test_cancellation_detection() {
        assert!(is_cancellation(&RequestCancelled.into()));
        assert!(is_cancellation(
            &anyhow::Error::from(StorageError::cancelled("upload")).context("uploading image")
        ));
        assert!(!is_cancellation(&anyhow::anyhow!("boom")));
    }
}
