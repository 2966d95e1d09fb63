mod in_memory_product_repository;
mod postgres_product_repository;

pub use in_memory_product_repository::InMemoryProductRepository;
pub use postgres_product_repository::PostgresProductRepository;
