mod catalog_errors;
mod domain_errors;
mod storage_errors;

pub use catalog_errors::*;
pub use domain_errors::*;
pub use storage_errors::*;
