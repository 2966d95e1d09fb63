use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    adapters::outbound::cancellable,
    domain::{
        errors::{StorageError, StorageResult},
        models::{PagedResult, Product, ProductCategory, ProductSnapshot},
        value_objects::{ProductId, ProductImage},
    },
    ports::repositories::{ProductQuery, ProductRepository},
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id UUID PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    description VARCHAR(500) NOT NULL,
    price NUMERIC(18, 2) NOT NULL,
    category VARCHAR(32) NOT NULL,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    image_path VARCHAR(500)
);

CREATE INDEX IF NOT EXISTS idx_products_active_price ON products(price) WHERE active;
CREATE INDEX IF NOT EXISTS idx_products_category ON products(category);
CREATE INDEX IF NOT EXISTS idx_products_status ON products(active);
CREATE INDEX IF NOT EXISTS idx_products_active_category_price ON products(category, price) WHERE active;
"#;

const SELECT_COLUMNS: &str =
    "SELECT id, name, description, price, category, active, image_path FROM products";

/// PostgreSQL implementation of ProductRepository
#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    price: Decimal,
    category: String,
    active: bool,
    image_path: Option<String>,
}

impl ProductRow {
    /// Rehydrate through the entity so stored rows obey the same invariants
    fn into_product(self) -> StorageResult<Product> {
        let id = self.id;
        let corrupt = |reason: String| StorageError::CorruptRecord {
            id: id.to_string(),
            reason,
        };

        let category = self
            .category
            .parse::<ProductCategory>()
            .map_err(|e| corrupt(e.to_string()))?;
        let image = self
            .image_path
            .map(ProductImage::new)
            .transpose()
            .map_err(|e| corrupt(e.to_string()))?;

        Product::restore(ProductSnapshot {
            id: ProductId::from_uuid(id),
            name: self.name,
            description: self.description,
            price: self.price,
            category,
            active: self.active,
            image,
        })
        .map_err(|e| corrupt(e.to_string()))
    }
}

fn database_error(action: &'static str) -> impl FnOnce(sqlx::Error) -> StorageError {
    move |e| StorageError::InfrastructureError {
        message: format!("Database error {}: {}", action, e),
        source: Some(e.to_string()),
    }
}

/// Append the WHERE clause shared by the count and page queries
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ProductQuery) {
    builder.push(" WHERE TRUE");

    if let Some(min_price) = query.min_price {
        builder.push(" AND price >= ").push_bind(min_price);
    }
    if let Some(max_price) = query.max_price {
        builder.push(" AND price <= ").push_bind(max_price);
    }
    if let Some(active) = query.active {
        builder.push(" AND active = ").push_bind(active);
    }
    if let Some(category) = query.effective_category() {
        builder.push(" AND category = ").push_bind(category.as_str());
    }
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a new pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Initialize database tables and indexes
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn add(&self, product: &Product, cancel: &CancellationToken) -> StorageResult<()> {
        cancellable("add", cancel, async {
            sqlx::query(
                r#"
                INSERT INTO products (id, name, description, price, category, active, image_path)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(*product.id().as_uuid())
            .bind(product.name())
            .bind(product.description())
            .bind(product.price())
            .bind(product.category().as_str())
            .bind(product.is_active())
            .bind(product.image().map(ProductImage::path))
            .execute(&self.pool)
            .await
            .map_err(database_error("inserting product"))?;

            Ok(())
        })
        .await
    }

    async fn get_by_id(
        &self,
        id: ProductId,
        cancel: &CancellationToken,
    ) -> StorageResult<Option<Product>> {
        cancellable("get_by_id", cancel, async {
            let row = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
                .bind(*id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(database_error("loading product"))?;

            row.map(ProductRow::into_product).transpose()
        })
        .await
    }

    async fn delete(&self, product: &Product, cancel: &CancellationToken) -> StorageResult<()> {
        cancellable("delete", cancel, async {
            sqlx::query("DELETE FROM products WHERE id = $1")
                .bind(*product.id().as_uuid())
                .execute(&self.pool)
                .await
                .map_err(database_error("deleting product"))?;

            Ok(())
        })
        .await
    }

    async fn update(&self, product: &Product, cancel: &CancellationToken) -> StorageResult<()> {
        cancellable("update", cancel, async {
            let result = sqlx::query(
                r#"
                UPDATE products
                SET name = $2, description = $3, price = $4, category = $5,
                    active = $6, image_path = $7
                WHERE id = $1
                "#,
            )
            .bind(*product.id().as_uuid())
            .bind(product.name())
            .bind(product.description())
            .bind(product.price())
            .bind(product.category().as_str())
            .bind(product.is_active())
            .bind(product.image().map(ProductImage::path))
            .execute(&self.pool)
            .await
            .map_err(database_error("updating product"))?;

            if result.rows_affected() == 0 {
                return Err(StorageError::StorageBackendError {
                    message: format!("product {} does not exist", product.id()),
                });
            }

            Ok(())
        })
        .await
    }

    async fn query(
        &self,
        query: &ProductQuery,
        cancel: &CancellationToken,
    ) -> StorageResult<PagedResult<Product>> {
        cancellable("query", cancel, async {
            let request = query.page_request();

            let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
            push_filters(&mut count, query);
            let total: i64 = count
                .build_query_scalar()
                .fetch_one(&self.pool)
                .await
                .map_err(database_error("counting products"))?;

            let mut page = QueryBuilder::<Postgres>::new(SELECT_COLUMNS);
            push_filters(&mut page, query);
            page.push(" ORDER BY id LIMIT ")
                .push_bind(i64::try_from(request.limit()).unwrap_or(i64::MAX))
                .push(" OFFSET ")
                .push_bind(i64::try_from(request.offset()).unwrap_or(i64::MAX));

            let rows: Vec<ProductRow> = page
                .build_query_as()
                .fetch_all(&self.pool)
                .await
                .map_err(database_error("querying products"))?;

            let items = rows
                .into_iter()
                .map(ProductRow::into_product)
                .collect::<StorageResult<Vec<_>>>()?;

            Ok(PagedResult::new(
                items,
                u64::try_from(total).unwrap_or_default(),
                request,
            ))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(category: &str, price: Decimal, image_path: Option<&str>) -> ProductRow {
        ProductRow {
            id: Uuid::now_v7(),
            name: "Kettle".to_string(),
            description: "1.7 litre".to_string(),
            price,
            category: category.to_string(),
            active: true,
            image_path: image_path.map(str::to_string),
        }
    }

    #[test]
    fn test_row_rehydrates_product() {
        let product = row(
            "Home",
            Decimal::new(2999, 2),
            Some("https://cdn.example.com/products/k.png"),
        )
        .into_product()
        .unwrap();

        assert_eq!(product.category(), ProductCategory::Home);
        assert_eq!(
            product.image().map(ProductImage::path),
            Some("https://cdn.example.com/products/k.png")
        );
    }

    #[test]
    fn test_corrupt_rows_are_reported() {
        for bad in [
            row("Gadgets", Decimal::ONE, None),
            row("Home", Decimal::ZERO, None),
            row("Undefined", Decimal::ONE, None),
            row("Home", Decimal::ONE, Some("relative/path.png")),
        ] {
            let id = bad.id.to_string();
            match bad.into_product() {
                Err(StorageError::CorruptRecord { id: reported, .. }) => assert_eq!(reported, id),
                other => panic!("expected a corrupt record, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_filters_render_in_order() {
        let query = ProductQuery {
            min_price: Some(Decimal::ONE),
            active: Some(false),
            category: Some(ProductCategory::Undefined),
            ..Default::default()
        };

        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
        push_filters(&mut builder, &query);

        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM products WHERE TRUE AND price >= $1 AND active = $2"
        );
    }
}
