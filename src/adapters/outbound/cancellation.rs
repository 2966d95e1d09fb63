use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::domain::errors::{StorageError, StorageResult};

/// Race a port operation against the caller's token
pub(crate) async fn cancellable<T>(
    operation: &'static str,
    cancel: &CancellationToken,
    future: impl Future<Output = StorageResult<T>>,
) -> StorageResult<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(StorageError::cancelled(operation)),
        result = future => result,
    }
}
