//! MySQL product repository implementation.

use crate::{traits::ProductRepository, DatabasePoolInterface};
use async_trait::async_trait;
use catalog_core::{CatalogError, CatalogResult, NewProduct, PageRequest, Product, ProductId};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// MySQL product repository implementation.
#[derive(Clone)]
pub struct MySqlProductRepository {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlProductRepository {
    /// Creates a new MySQL product repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a product.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price: f64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product::new(ProductId(row.id), row.name, row.price)
    }
}

#[async_trait]
impl ProductRepository for MySqlProductRepository {
    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        debug!("Finding product by id: {}", id);

        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price
            FROM products
            WHERE id = ?
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Product::from))
    }

    async fn find_all(&self, page: PageRequest) -> CatalogResult<Vec<Product>> {
        debug!("Finding products: page={}, page_size={}", page.page, page.page_size);

        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price
            FROM products
            ORDER BY id ASC
            LIMIT ? OFFSET ?
            ",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn save(&self, product: &NewProduct) -> CatalogResult<Product> {
        debug!("Saving product: {}", product.name);

        let result = sqlx::query(
            r"
            INSERT INTO products (name, price)
            VALUES (?, ?)
            ",
        )
        .bind(&product.name)
        .bind(product.price)
        .execute(self.pool.inner())
        .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| CatalogError::Database("Generated id out of range".to_string()))?;

        Ok(product.clone().with_id(ProductId(id)))
    }

    async fn update(&self, product: &Product) -> CatalogResult<Option<Product>> {
        debug!("Updating product: {}", product.id);

        sqlx::query(
            r"
            UPDATE products
            SET name = ?, price = ?
            WHERE id = ?
            ",
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(product.id.into_inner())
        .execute(self.pool.inner())
        .await?;

        // rows_affected is 0 for a no-op update, so read back instead
        self.find_by_id(product.id).await
    }

    async fn delete(&self, id: ProductId) -> CatalogResult<bool> {
        debug!("Deleting product: {}", id);

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> CatalogResult<()> {
        self.pool.health_check().await
    }

    fn backend_name(&self) -> &'static str {
        "mysql"
    }
}
