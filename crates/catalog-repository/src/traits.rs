//! Repository trait definitions.

use catalog_core::{CatalogResult, Interface, NewProduct, PageRequest, Product, ProductId};
use async_trait::async_trait;

/// Product store.
///
/// The store is the source of truth for products. Absence is reported through
/// `Option`/`bool`; errors are reserved for store failures.
#[async_trait]
pub trait ProductRepository: Interface + Send + Sync {
    /// Finds a product by ID.
    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>>;

    /// Finds a page of products ordered by ID ascending.
    async fn find_all(&self, page: PageRequest) -> CatalogResult<Vec<Product>>;

    /// Persists a new product and returns it with its assigned ID.
    async fn save(&self, product: &NewProduct) -> CatalogResult<Product>;

    /// Replaces name and price of an existing product.
    ///
    /// Returns `None` when no product with that ID exists.
    async fn update(&self, product: &Product) -> CatalogResult<Option<Product>>;

    /// Deletes a product by ID. Returns `false` when nothing was deleted.
    async fn delete(&self, id: ProductId) -> CatalogResult<bool>;

    /// Checks that the store is reachable.
    async fn health_check(&self) -> CatalogResult<()> {
        Ok(())
    }

    /// Short backend name for logs and readiness output.
    fn backend_name(&self) -> &'static str;
}
