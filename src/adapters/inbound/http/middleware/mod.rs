mod cancellation;

pub use cancellation::RequestCancellation;
