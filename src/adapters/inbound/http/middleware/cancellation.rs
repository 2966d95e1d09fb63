use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Per-request cancellation token.
///
/// The token is cancelled when the extractor is dropped: when the handler
/// future completes, is abandoned by a disconnecting client, or is cut off by
/// the timeout layer.
pub struct RequestCancellation {
    token: CancellationToken,
    _guard: DropGuard,
}

impl RequestCancellation {
    pub fn new() -> Self {
        let token = CancellationToken::new();
        Self {
            _guard: token.clone().drop_guard(),
            token,
        }
    }

    /// Token to hand to the pipeline
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

impl Default for RequestCancellation {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> FromRequestParts<S> for RequestCancellation
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::new())
    }
}
