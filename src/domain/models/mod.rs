pub mod paging;
pub mod product;

pub use paging::*;
pub use product::*;
