//! Product service trait definition.

use crate::dto::{CreateProductRequest, ReadinessReport, UpdateProductRequest};
use async_trait::async_trait;
use catalog_core::{CatalogResult, Interface, PageRequest, Product, ProductId};

/// Product service trait.
///
/// Lookups that find nothing return `None`/`false` rather than an error.
#[async_trait]
pub trait ProductService: Interface + Send + Sync {
    /// Validates and stores a new product.
    async fn create_product(&self, request: CreateProductRequest) -> CatalogResult<Product>;

    /// Gets a product by ID, served from the cache when possible.
    async fn get_product(&self, id: ProductId) -> CatalogResult<Option<Product>>;

    /// Lists products in ID order. Never cached.
    async fn list_products(&self, page: PageRequest) -> CatalogResult<Vec<Product>>;

    /// Replaces a product's name and price. `None` if the product does not exist.
    async fn update_product(
        &self,
        id: ProductId,
        request: UpdateProductRequest,
    ) -> CatalogResult<Option<Product>>;

    /// Deletes a product. `false` if the product does not exist.
    async fn delete_product(&self, id: ProductId) -> CatalogResult<bool>;

    /// Reports whether the store and cache are reachable.
    async fn readiness(&self) -> ReadinessReport;
}
