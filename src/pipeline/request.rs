use std::{
    marker::PhantomData,
    sync::Arc,
    task::{Context, Poll},
};

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use tower::Service;

use super::Outcome;

/// A use-case request and the type of value it produces on success
pub trait Request: Send + Sync + 'static {
    type Response: Send + 'static;
}

/// Executes one request type.
///
/// `Ok` carries deliberate, typed outcomes. `Err` is reserved for domain
/// invariant violations and unexpected faults; only the exception guard
/// observes it.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync + 'static {
    async fn handle(
        &self,
        request: R,
        cancel: &CancellationToken,
    ) -> anyhow::Result<Outcome<R::Response>>;
}

/// Raised when the caller's token fires before the handler completes
#[derive(Debug, thiserror::Error)]
#[error("request was cancelled before the handler completed")]
pub struct RequestCancelled;

/// A request travelling through the pipeline together with its cancellation token
pub struct Envelope<R> {
    pub request: R,
    pub cancel: CancellationToken,
}

impl<R> Envelope<R> {
    pub fn new(request: R, cancel: CancellationToken) -> Self {
        Self { request, cancel }
    }
}

/// Innermost service of every pipeline: invokes the handler
pub struct HandlerService<R: Request> {
    handler: Arc<dyn RequestHandler<R>>,
    _request: PhantomData<fn() -> R>,
}

impl<R: Request> HandlerService<R> {
    pub fn new(handler: Arc<dyn RequestHandler<R>>) -> Self {
        Self {
            handler,
            _request: PhantomData,
        }
    }
}

impl<R: Request> Clone for HandlerService<R> {
    fn clone(&self) -> Self {
        Self::new(self.handler.clone())
    }
}

impl<R: Request> Service<Envelope<R>> for HandlerService<R> {
    type Response = Outcome<R::Response>;
    type Error = anyhow::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, envelope: Envelope<R>) -> Self::Future {
        let handler = self.handler.clone();

        Box::pin(async move {
            let Envelope { request, cancel } = envelope;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(RequestCancelled.into()),
                outcome = handler.handle(request, &cancel) => outcome,
            }
        })
    }
}
