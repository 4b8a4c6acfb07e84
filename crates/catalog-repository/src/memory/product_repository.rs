//! In-memory product repository.

use crate::traits::ProductRepository;
use async_trait::async_trait;
use catalog_core::{CatalogResult, NewProduct, PageRequest, Product, ProductId};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::debug;

/// Product store kept in process memory.
///
/// IDs are assigned from a monotonic counter starting at 1 and are never reused,
/// matching `AUTO_INCREMENT` semantics.
#[derive(Debug)]
pub struct InMemoryProductRepository {
    products: RwLock<BTreeMap<ProductId, Product>>,
    next_id: AtomicI64,
}

impl InMemoryProductRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            products: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    /// Returns true if no products are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.read().is_empty()
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        debug!("Finding product by id: {}", id);
        Ok(self.products.read().get(&id).cloned())
    }

    async fn find_all(&self, page: PageRequest) -> CatalogResult<Vec<Product>> {
        debug!("Finding products: page={}, page_size={}", page.page, page.page_size);
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);

        Ok(self
            .products
            .read()
            .values()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn save(&self, product: &NewProduct) -> CatalogResult<Product> {
        debug!("Saving product: {}", product.name);
        let id = ProductId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let stored = product.clone().with_id(id);
        self.products.write().insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, product: &Product) -> CatalogResult<Option<Product>> {
        debug!("Updating product: {}", product.id);
        let mut products = self.products.write();
        Ok(products.get_mut(&product.id).map(|existing| {
            existing.replace(product.name.clone(), product.price);
            existing.clone()
        }))
    }

    async fn delete(&self, id: ProductId) -> CatalogResult<bool> {
        debug!("Deleting product: {}", id);
        Ok(self.products.write().remove(&id).is_some())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page: i64, size: i64) -> PageRequest {
        PageRequest::new(page, size).unwrap()
    }

    #[tokio::test]
    async fn test_save_and_find_by_id() {
        let repo = InMemoryProductRepository::new();

        let saved = repo.save(&NewProduct::new("Widget", 9.99)).await.unwrap();
        assert_eq!(saved.id, ProductId(1));

        let found = repo.find_by_id(saved.id).await.unwrap();
        assert_eq!(found, Some(saved));
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let repo = InMemoryProductRepository::new();
        assert!(repo.find_by_id(ProductId(404)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_monotonic_and_not_reused() {
        let repo = InMemoryProductRepository::new();
        let first = repo.save(&NewProduct::new("A", 1.0)).await.unwrap();
        assert!(repo.delete(first.id).await.unwrap());

        let second = repo.save(&NewProduct::new("B", 2.0)).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_find_all_pages_in_id_order() {
        let repo = InMemoryProductRepository::new();
        for i in 0..25 {
            repo.save(&NewProduct::new(format!("Product {i}"), f64::from(i)))
                .await
                .unwrap();
        }

        let first = repo.find_all(page(1, 10)).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(first[0].id, ProductId(1));

        let third = repo.find_all(page(3, 10)).await.unwrap();
        assert_eq!(third.len(), 5);
        assert_eq!(third[0].id, ProductId(21));

        let beyond = repo.find_all(page(4, 10)).await.unwrap();
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let repo = InMemoryProductRepository::new();
        let saved = repo.save(&NewProduct::new("Widget", 9.99)).await.unwrap();

        let updated = repo
            .update(&Product::new(saved.id, "Widget2", 12.0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Widget2");

        let found = repo.find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(found, updated);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let repo = InMemoryProductRepository::new();
        let result = repo.update(&Product::new(ProductId(9), "Ghost", 1.0)).await.unwrap();
        assert!(result.is_none());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryProductRepository::new();
        let saved = repo.save(&NewProduct::new("Widget", 9.99)).await.unwrap();

        assert!(repo.delete(saved.id).await.unwrap());
        assert!(!repo.delete(saved.id).await.unwrap());
        assert!(repo.find_by_id(saved.id).await.unwrap().is_none());
        assert_eq!(repo.len(), 0);
    }

    #[tokio::test]
    async fn test_health_check_and_name() {
        let repo = InMemoryProductRepository::new();
        assert!(repo.health_check().await.is_ok());
        assert_eq!(repo.backend_name(), "memory");
    }
}
