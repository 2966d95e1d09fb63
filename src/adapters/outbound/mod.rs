mod cancellation;
pub mod persistence;
pub mod storage;

pub(crate) use cancellation::cancellable;
