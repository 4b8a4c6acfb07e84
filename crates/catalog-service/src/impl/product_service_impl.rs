//! Product service implementation.

use crate::cache::{cache_keys, ReadThroughCache};
use crate::dto::{CreateProductRequest, DependencyStatus, ReadinessReport, UpdateProductRequest};
use crate::metrics;
use crate::product_service::ProductService;
use async_trait::async_trait;
use catalog_config::CacheConfig;
use catalog_core::{CatalogResult, NewProduct, PageRequest, Product, ProductId, ValidateExt};
use catalog_repository::ProductRepository;
use catalog_resilience::RetryPolicy;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Cache behavior of the product service.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// TTL applied to every cache write.
    pub ttl: Duration,
    /// Retry schedule for removing a key after a committed write.
    pub invalidation: RetryPolicy,
}

impl CacheSettings {
    /// Builds settings from the `cache` config section.
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            ttl: config.default_ttl(),
            invalidation: RetryPolicy::with_max_attempts(config.invalidation_retries)
                .initial_delay(config.invalidation_backoff()),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

/// Product service backed by a store and a read-through cache.
///
/// Reads go through the cache; writes go to the store and then invalidate the
/// product's cache key.
pub struct ProductServiceImpl {
    repository: Arc<dyn ProductRepository>,
    cache: Arc<ReadThroughCache>,
    settings: CacheSettings,
}

impl ProductServiceImpl {
    /// Creates a new product service.
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        cache: Arc<ReadThroughCache>,
        settings: CacheSettings,
    ) -> Self {
        Self {
            repository,
            cache,
            settings,
        }
    }

    /// Removes the cache entry for `id`, retrying with backoff.
    ///
    /// Runs on its own task so the removal completes even if the caller is
    /// dropped after the store write. Failure is logged and counted, never
    /// returned.
    async fn invalidate(&self, id: ProductId) {
        let key = cache_keys::product_by_id(id);
        let cache = Arc::clone(&self.cache);
        let policy = self.settings.invalidation.clone();

        let task = tokio::spawn(async move {
            if let Err(e) = policy.execute(|| cache.remove(&key)).await {
                error!(
                    key = %key,
                    error = %e,
                    "Cache invalidation failed; entry may be stale until it expires"
                );
                metrics::record_invalidation_failure();
            }
        });

        if let Err(e) = task.await {
            error!(product_id = %id, error = %e, "Cache invalidation task did not complete");
        }
    }
}

#[async_trait]
impl ProductService for ProductServiceImpl {
    async fn create_product(&self, request: CreateProductRequest) -> CatalogResult<Product> {
        debug!("Creating product: {}", request.name);

        request.validate_request()?;

        let product = self.repository.save(&NewProduct::from(request)).await?;

        // a missing marker may be cached under the new id
        self.invalidate(product.id).await;

        info!("Product created: {} ({})", product.id, product.name);
        Ok(product)
    }

    async fn get_product(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        debug!("Getting product: {}", id);

        let key = cache_keys::product_by_id(id);
        self.cache
            .get_or_load(&key, self.settings.ttl, || self.repository.find_by_id(id))
            .await
    }

    async fn list_products(&self, page: PageRequest) -> CatalogResult<Vec<Product>> {
        debug!("Listing products: page={}, size={}", page.page, page.page_size);

        self.repository.find_all(page).await
    }

    async fn update_product(
        &self,
        id: ProductId,
        request: UpdateProductRequest,
    ) -> CatalogResult<Option<Product>> {
        debug!("Updating product: {}", id);

        let Some(mut product) = self.repository.find_by_id(id).await? else {
            return Ok(None);
        };

        request.validate_request()?;
        product.replace(request.name, request.price);

        let updated = self.repository.update(&product).await?;
        self.invalidate(id).await;

        if updated.is_some() {
            info!("Product updated: {}", id);
        }
        Ok(updated)
    }

    async fn delete_product(&self, id: ProductId) -> CatalogResult<bool> {
        debug!("Deleting product: {}", id);

        if self.repository.find_by_id(id).await?.is_none() {
            return Ok(false);
        }

        let deleted = self.repository.delete(id).await?;
        self.invalidate(id).await;

        if deleted {
            info!("Product deleted: {}", id);
        }
        Ok(deleted)
    }

    async fn readiness(&self) -> ReadinessReport {
        let store = DependencyStatus::from_result(
            self.repository.backend_name(),
            self.repository.health_check().await,
        );
        let cache = DependencyStatus::from_result(
            self.cache.backend().backend_name(),
            self.cache.ping().await,
        );

        ReadinessReport { store, cache }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheInterface, MemoryCacheService};
    use catalog_core::CatalogError;
    use catalog_repository::InMemoryProductRepository;
    use mockall::mock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    mock! {
        pub Repo {}

        #[async_trait]
        impl ProductRepository for Repo {
            async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>>;
            async fn find_all(&self, page: PageRequest) -> CatalogResult<Vec<Product>>;
            async fn save(&self, product: &NewProduct) -> CatalogResult<Product>;
            async fn update(&self, product: &Product) -> CatalogResult<Option<Product>>;
            async fn delete(&self, id: ProductId) -> CatalogResult<bool>;
            async fn health_check(&self) -> CatalogResult<()>;
            fn backend_name(&self) -> &'static str;
        }
    }

    /// Store that serves the first `find_by_id` and fails every later one.
    #[derive(Default)]
    struct FlakyRepository {
        inner: InMemoryProductRepository,
        finds: AtomicUsize,
    }

    #[async_trait]
    impl ProductRepository for FlakyRepository {
        async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
            if self.finds.fetch_add(1, Ordering::SeqCst) > 0 {
                return Err(CatalogError::Database("connection reset".to_string()));
            }
            self.inner.find_by_id(id).await
        }

        async fn find_all(&self, page: PageRequest) -> CatalogResult<Vec<Product>> {
            self.inner.find_all(page).await
        }

        async fn save(&self, product: &NewProduct) -> CatalogResult<Product> {
            self.inner.save(product).await
        }

        async fn update(&self, product: &Product) -> CatalogResult<Option<Product>> {
            self.inner.update(product).await
        }

        async fn delete(&self, id: ProductId) -> CatalogResult<bool> {
            self.inner.delete(id).await
        }

        fn backend_name(&self) -> &'static str {
            "flaky"
        }
    }

    /// Cache that reads and writes fine but can never delete.
    #[derive(Default)]
    struct UndeletableCache {
        inner: MemoryCacheService,
        deletes: AtomicUsize,
    }

    #[async_trait]
    impl CacheInterface for UndeletableCache {
        async fn get_raw(&self, key: &str) -> CatalogResult<Option<String>> {
            self.inner.get_raw(key).await
        }

        async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CatalogResult<()> {
            self.inner.set_raw(key, value, ttl).await
        }

        async fn delete(&self, _key: &str) -> CatalogResult<bool> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            Err(CatalogError::cache("connection refused"))
        }

        async fn ping(&self) -> CatalogResult<()> {
            Err(CatalogError::cache("connection refused"))
        }

        fn is_enabled(&self) -> bool {
            true
        }

        fn backend_name(&self) -> &'static str {
            "undeletable"
        }
    }

    fn settings() -> CacheSettings {
        CacheSettings {
            ttl: Duration::from_secs(60),
            invalidation: RetryPolicy::with_max_attempts(3).initial_delay(Duration::from_millis(1)),
        }
    }

    fn service_with(
        repository: Arc<dyn ProductRepository>,
        backend: Arc<dyn CacheInterface>,
    ) -> ProductServiceImpl {
        service_with_settings(repository, backend, settings())
    }

    fn service_with_settings(
        repository: Arc<dyn ProductRepository>,
        backend: Arc<dyn CacheInterface>,
        settings: CacheSettings,
    ) -> ProductServiceImpl {
        let cache = Arc::new(ReadThroughCache::new(backend));
        ProductServiceImpl::new(repository, cache, settings)
    }

    fn memory_service() -> (
        ProductServiceImpl,
        Arc<InMemoryProductRepository>,
        Arc<MemoryCacheService>,
    ) {
        let repository = Arc::new(InMemoryProductRepository::new());
        let backend = Arc::new(MemoryCacheService::new());
        let service = service_with(repository.clone(), backend.clone());
        (service, repository, backend)
    }

    fn create(name: &str, price: f64) -> CreateProductRequest {
        CreateProductRequest {
            name: name.to_string(),
            price,
        }
    }

    fn update(name: &str, price: f64) -> UpdateProductRequest {
        UpdateProductRequest {
            name: name.to_string(),
            price,
        }
    }

    #[tokio::test]
    async fn test_unknown_product_is_none_twice() {
        let (service, _, backend) = memory_service();

        assert!(service.get_product(ProductId::new(99)).await.unwrap().is_none());
        assert!(service.get_product(ProductId::new(99)).await.unwrap().is_none());

        // the missing result is cached
        assert_eq!(
            backend.get_raw("products-99").await.unwrap().as_deref(),
            Some("\"missing\"")
        );
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (service, _, _) = memory_service();

        let created = service.create_product(create("Widget", 9.99)).await.unwrap();
        let fetched = service.get_product(created.id).await.unwrap().unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Widget");
        assert!((fetched.price - 9.99).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_create_does_not_populate_cache() {
        let (service, _, backend) = memory_service();

        let created = service.create_product(create("Widget", 9.99)).await.unwrap();

        let key = cache_keys::product_by_id(created.id);
        assert!(backend.get_raw(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_clears_cached_missing_marker() {
        let (service, _, _) = memory_service();

        // ids start at 1, so this caches a missing marker for the next product
        assert!(service.get_product(ProductId::new(1)).await.unwrap().is_none());

        let created = service.create_product(create("Widget", 9.99)).await.unwrap();
        assert_eq!(created.id, ProductId::new(1));

        assert_eq!(service.get_product(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_update_replaces_cached_value() {
        let (service, _, _) = memory_service();
        let created = service.create_product(create("Widget", 9.99)).await.unwrap();

        // warm the cache with the old values
        service.get_product(created.id).await.unwrap();

        let updated = service
            .update_product(created.id, update("Widget2", 12.0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Widget2");

        let fetched = service.get_product(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Widget2");
        assert!((fetched.price - 12.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_update_missing_product_returns_none() {
        let (service, repository, _) = memory_service();

        let result = service
            .update_product(ProductId::new(5), update("Ghost", 1.0))
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(repository.is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_values() {
        let (service, _, _) = memory_service();
        let created = service.create_product(create("Widget", 9.99)).await.unwrap();

        let err = service
            .update_product(created.id, update("", -1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        let unchanged = service.get_product(created.id).await.unwrap().unwrap();
        assert_eq!(unchanged, created);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_none() {
        let (service, _, _) = memory_service();
        let created = service.create_product(create("Widget", 9.99)).await.unwrap();
        service.get_product(created.id).await.unwrap();

        assert!(service.delete_product(created.id).await.unwrap());
        assert!(service.get_product(created.id).await.unwrap().is_none());
        assert!(!service.delete_product(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_products_passes_through() {
        let (service, _, backend) = memory_service();
        for i in 0..15_i32 {
            service
                .create_product(create(&format!("Product {i}"), f64::from(i)))
                .await
                .unwrap();
        }

        let first = service.list_products(PageRequest::first()).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(first[0].id, ProductId::new(1));

        let second = service
            .list_products(PageRequest::new(2, 10).unwrap())
            .await
            .unwrap();
        assert_eq!(second.len(), 5);
        assert_eq!(second[0].id, ProductId::new(11));

        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_second_get_served_from_cache_when_store_fails() {
        let repository = Arc::new(FlakyRepository::default());
        let seeded = repository.inner.save(&NewProduct::new("Widget", 9.99)).await.unwrap();
        let service = service_with(repository.clone(), Arc::new(MemoryCacheService::new()));

        let first = service.get_product(seeded.id).await.unwrap();
        let second = service.get_product(seeded.id).await.unwrap();

        assert_eq!(first, Some(seeded.clone()));
        assert_eq!(second, Some(seeded));
        assert_eq!(repository.finds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_price_performs_no_store_write() {
        let mut repository = MockRepo::new();
        repository.expect_save().never();

        let service = service_with(Arc::new(repository), Arc::new(MemoryCacheService::new()));
        let err = service.create_product(create("Widget", -1.0)).await.unwrap_err();

        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_of_absent_product_skips_write() {
        let mut repository = MockRepo::new();
        repository.expect_find_by_id().times(1).returning(|_| Ok(None));
        repository.expect_update().never();

        let service = service_with(Arc::new(repository), Arc::new(MemoryCacheService::new()));
        let result = service
            .update_product(ProductId::new(3), update("Widget", 1.0))
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_store_errors_propagate_and_are_not_cached() {
        let mut repository = MockRepo::new();
        repository
            .expect_find_by_id()
            .times(2)
            .returning(|_| Err(CatalogError::Database("connection refused".to_string())));

        let backend = Arc::new(MemoryCacheService::new());
        let service = service_with(Arc::new(repository), backend.clone());

        for _ in 0..2 {
            let err = service.get_product(ProductId::new(1)).await.unwrap_err();
            assert!(matches!(err, CatalogError::Database(_)));
        }
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_invalidation_failure_does_not_fail_update() {
        let repository = Arc::new(InMemoryProductRepository::new());
        let backend = Arc::new(UndeletableCache::default());
        let service = service_with(repository.clone(), backend.clone());

        let created = repository.save(&NewProduct::new("Widget", 9.99)).await.unwrap();
        let updated = service
            .update_product(created.id, update("Widget2", 12.0))
            .await
            .unwrap();

        assert_eq!(updated.map(|p| p.name), Some("Widget2".to_string()));
        assert_eq!(backend.deletes.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_leave_entry_absent() {
        let repository = Arc::new(InMemoryProductRepository::new());
        let backend = Arc::new(MemoryCacheService::new());
        let service = Arc::new(service_with(repository.clone(), backend.clone()));

        let id = service.create_product(create("Widget", 1.0)).await.unwrap().id;
        service.get_product(id).await.unwrap();

        let handles: Vec<_> = (0..16_i32)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service
                        .update_product(id, update(&format!("Widget {i}"), f64::from(i)))
                        .await
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().unwrap().is_some());
        }

        let key = cache_keys::product_by_id(id);
        assert!(backend.get_raw(&key).await.unwrap().is_none());

        let committed = repository.find_by_id(id).await.unwrap();
        assert_eq!(service.get_product(id).await.unwrap(), committed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_and_gets_converge_within_ttl() {
        let ttl = Duration::from_millis(50);
        let repository = Arc::new(InMemoryProductRepository::new());
        let service = Arc::new(service_with_settings(
            repository.clone(),
            Arc::new(MemoryCacheService::new()),
            CacheSettings { ttl, ..settings() },
        ));

        let id = service.create_product(create("Widget", 1.0)).await.unwrap().id;

        let mut handles = Vec::new();
        for i in 0..16_i32 {
            let writer = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                writer
                    .update_product(id, update(&format!("Widget {i}"), f64::from(i)))
                    .await
                    .map(|updated| updated.is_some())
            }));
            for _ in 0..2 {
                let reader = Arc::clone(&service);
                handles.push(tokio::spawn(async move {
                    reader.get_product(id).await.map(|found| found.is_some())
                }));
            }
        }
        for handle in handles {
            assert!(handle.await.unwrap().unwrap());
        }

        tokio::time::sleep(ttl * 2).await;

        let committed = repository.find_by_id(id).await.unwrap();
        assert!(committed.is_some());
        assert_eq!(service.get_product(id).await.unwrap(), committed);
    }

    #[tokio::test]
    async fn test_readiness_reports_degraded_cache() {
        let repository = Arc::new(InMemoryProductRepository::new());
        let service = service_with(repository, Arc::new(UndeletableCache::default()));

        let report = service.readiness().await;

        assert!(report.is_ready());
        assert!(report.is_degraded());
        assert_eq!(report.store.backend, "memory");
        assert_eq!(report.cache.backend, "undeletable");
    }

    #[tokio::test]
    async fn test_readiness_reports_store_failure() {
        let mut repository = MockRepo::new();
        repository
            .expect_health_check()
            .returning(|| Err(CatalogError::Database("down".to_string())));
        repository.expect_backend_name().return_const("mysql");

        let service = service_with(Arc::new(repository), Arc::new(MemoryCacheService::new()));
        let report = service.readiness().await;

        assert!(!report.is_ready());
        assert_eq!(report.store.backend, "mysql");
    }

    #[test]
    fn test_cache_settings_from_config() {
        let config = CacheConfig {
            default_ttl_secs: 30,
            invalidation_retries: 5,
            invalidation_backoff_ms: 10,
            ..CacheConfig::default()
        };

        let settings = CacheSettings::from_config(&config);

        assert_eq!(settings.ttl, Duration::from_secs(30));
        assert_eq!(settings.invalidation.max_attempts, 5);
        assert_eq!(settings.invalidation.initial_delay, Duration::from_millis(10));
    }
}
