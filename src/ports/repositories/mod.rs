mod product_repository;

pub use product_repository::{ProductQuery, ProductRepository};

#[cfg(test)]
pub use product_repository::MockProductRepository;
