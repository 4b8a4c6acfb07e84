//! Dependency wiring.
//!
//! Components are built by hand in dependency order: store, cache backend,
//! read-through cache, then the product service. Each trait object is shared
//! through an `Arc`.

use catalog_config::{AppConfig, CacheBackend, DatabaseConfig, StoreBackend};
use catalog_core::CatalogResult;
use catalog_repository::{
    create_pool, DatabasePoolInterface, InMemoryProductRepository, MySqlProductRepository,
    ProductRepository,
};
use catalog_service::{
    CacheInterface, CacheSettings, MemoryCacheService, ProductService, ProductServiceImpl,
    ReadThroughCache, RedisCacheService,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Fully wired application components.
pub struct AppModule {
    product_service: Arc<dyn ProductService>,
    database_pool: Option<Arc<dyn DatabasePoolInterface>>,
}

impl AppModule {
    /// The product service.
    pub fn product_service(&self) -> Arc<dyn ProductService> {
        Arc::clone(&self.product_service)
    }

    /// The database pool, when the MySQL store is in use.
    pub fn database_pool(&self) -> Option<Arc<dyn DatabasePoolInterface>> {
        self.database_pool.clone()
    }

    /// Releases external resources.
    pub async fn shutdown(&self) {
        if let Some(pool) = &self.database_pool {
            pool.close().await;
        }
    }
}

/// Builder for [`AppModule`].
///
/// Components not supplied explicitly are built from configuration.
pub struct AppModuleBuilder<'a> {
    config: &'a AppConfig,
    repository: Option<Arc<dyn ProductRepository>>,
    cache_backend: Option<Arc<dyn CacheInterface>>,
}

impl<'a> AppModuleBuilder<'a> {
    /// Creates a builder over the given configuration.
    pub fn new(config: &'a AppConfig) -> Self {
        Self {
            config,
            repository: None,
            cache_backend: None,
        }
    }

    /// Uses the given product store instead of the configured one.
    #[must_use]
    pub fn with_repository(mut self, repository: Arc<dyn ProductRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Uses the given cache backend instead of the configured one.
    #[must_use]
    pub fn with_cache_backend(mut self, backend: Arc<dyn CacheInterface>) -> Self {
        self.cache_backend = Some(backend);
        self
    }

    /// Builds all components.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached or migrated, or the
    /// Redis pool cannot be created.
    pub async fn build(self) -> CatalogResult<AppModule> {
        let (repository, database_pool) = match self.repository {
            Some(repository) => (repository, None),
            None => build_repository(&self.config.database).await?,
        };

        let backend = match self.cache_backend {
            Some(backend) => backend,
            None => build_cache_backend(self.config)?,
        };

        info!(
            store = repository.backend_name(),
            cache = backend.backend_name(),
            "Wiring product service"
        );

        let cache_config = &self.config.cache;
        let cache = Arc::new(
            ReadThroughCache::new(backend)
                .with_operation_timeout(cache_config.operation_timeout())
                .with_missing_markers(cache_config.cache_missing),
        );

        let product_service: Arc<dyn ProductService> = Arc::new(ProductServiceImpl::new(
            repository,
            cache,
            CacheSettings::from_config(cache_config),
        ));

        Ok(AppModule {
            product_service,
            database_pool,
        })
    }
}

type RepositoryParts = (
    Arc<dyn ProductRepository>,
    Option<Arc<dyn DatabasePoolInterface>>,
);

/// Builds the configured product store.
async fn build_repository(config: &DatabaseConfig) -> CatalogResult<RepositoryParts> {
    match config.backend {
        StoreBackend::Mysql => {
            let pool: Arc<dyn DatabasePoolInterface> = create_pool(config).await?;
            let repository = Arc::new(MySqlProductRepository::new(Arc::clone(&pool)));
            Ok((repository, Some(pool)))
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory product store; data is lost on restart");
            Ok((Arc::new(InMemoryProductRepository::new()), None))
        }
    }
}

/// Builds the configured cache backend.
fn build_cache_backend(config: &AppConfig) -> CatalogResult<Arc<dyn CacheInterface>> {
    match config.cache.backend {
        CacheBackend::Redis => Ok(Arc::new(RedisCacheService::from_config(&config.redis)?)),
        CacheBackend::Memory => Ok(Arc::new(MemoryCacheService::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_service::CreateProductRequest;

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.database.backend = StoreBackend::Memory;
        config.cache.backend = CacheBackend::Memory;
        config
    }

    #[tokio::test]
    async fn test_builds_memory_components() {
        let config = memory_config();
        let module = AppModuleBuilder::new(&config).build().await.unwrap();

        assert!(module.database_pool().is_none());

        let report = module.product_service().readiness().await;
        assert_eq!(report.store.backend, "memory");
        assert_eq!(report.cache.backend, "memory");
        assert!(report.is_ready());
    }

    #[tokio::test]
    async fn test_disabled_redis_builds_pass_through_cache() {
        let mut config = memory_config();
        config.cache.backend = CacheBackend::Redis;
        config.redis.enabled = false;

        let module = AppModuleBuilder::new(&config).build().await.unwrap();
        let report = module.product_service().readiness().await;

        assert_eq!(report.cache.backend, "disabled");
        assert!(report.cache.healthy);
    }

    #[tokio::test]
    async fn test_overrides_take_precedence() {
        let config = AppConfig::default();
        let repository = Arc::new(InMemoryProductRepository::new());

        let module = AppModuleBuilder::new(&config)
            .with_repository(repository.clone())
            .with_cache_backend(Arc::new(MemoryCacheService::new()))
            .build()
            .await
            .unwrap();

        let service = module.product_service();
        let created = service
            .create_product(CreateProductRequest {
                name: "Widget".to_string(),
                price: 9.99,
            })
            .await
            .unwrap();

        assert_eq!(repository.len(), 1);
        assert_eq!(service.get_product(created.id).await.unwrap(), Some(created));
    }
}
