//! OpenAPI documentation configuration.

use catalog_core::{ErrorResponse, FieldError, Product, ProductId};
use catalog_service::{CreateProductRequest, DependencyStatus, ReadinessReport, UpdateProductRequest};
use utoipa::OpenApi;

/// OpenAPI documentation for the Catalog Cloud API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog Cloud API",
        version = "1.0.0",
        description = "Product catalog with a read-through cache",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        crate::controllers::product_controller::list_products,
        crate::controllers::product_controller::create_product,
        crate::controllers::product_controller::get_product,
        crate::controllers::product_controller::update_product,
        crate::controllers::product_controller::delete_product,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            ProductId,
            Product,
            ErrorResponse,
            FieldError,
            CreateProductRequest,
            UpdateProductRequest,
            ReadinessReport,
            DependencyStatus,
            crate::controllers::health_controller::HealthResponse,
        )
    ),
    tags(
        (name = "products", description = "Product management endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_product_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/products"));
        assert!(doc.paths.paths.contains_key("/products/{id}"));
        assert!(doc.paths.paths.contains_key("/ready"));
    }
}
