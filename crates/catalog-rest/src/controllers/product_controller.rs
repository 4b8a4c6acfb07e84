//! Product management controller.

use crate::{
    extractors::{JsonBody, PaginationQuery, PathParam, QueryParams},
    responses::{no_content, ok, ApiResult, AppError},
    state::AppState,
};
use catalog_core::{CatalogError, PageRequest, Product, ProductId};
use catalog_service::{CreateProductRequest, UpdateProductRequest};
use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Router,
};
use tracing::debug;

const RESOURCE: &str = "Product";

/// Creates the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", get(get_product).put(update_product).delete(delete_product))
}

/// List products in ID order.
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, starting at 1"),
        ("pageSize" = Option<i64>, Query, description = "Items per page, at most 100")
    ),
    responses(
        (status = 200, description = "Page of products", body = [Product]),
        (status = 400, description = "Invalid paging parameters", body = catalog_core::ErrorResponse)
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    QueryParams(pagination): QueryParams<PaginationQuery>,
) -> ApiResult<Vec<Product>> {
    let page = PageRequest::try_from(pagination)?;
    debug!("List products request: page={}, size={}", page.page, page.page_size);

    let products = state.product_service.list_products(page).await?;
    ok(products)
}

/// Create a new product.
#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product created", body = Product),
        (status = 400, description = "Invalid product", body = catalog_core::ErrorResponse)
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateProductRequest>,
) -> ApiResult<Product> {
    debug!("Create product request: {}", request.name);

    let product = state.product_service.create_product(request).await?;
    ok(product)
}

/// Get a product by ID.
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, description = "Invalid product ID", body = catalog_core::ErrorResponse),
        (status = 404, description = "Product not found", body = catalog_core::ErrorResponse)
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Product> {
    debug!("Get product request: {}", id);

    let id = ProductId::new(id);
    match state.product_service.get_product(id).await? {
        Some(product) => ok(product),
        None => Err(CatalogError::not_found(RESOURCE, id).into()),
    }
}

/// Replace a product's name and price.
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 204, description = "Product updated"),
        (status = 400, description = "Invalid product", body = catalog_core::ErrorResponse),
        (status = 404, description = "Product not found", body = catalog_core::ErrorResponse)
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(request): JsonBody<UpdateProductRequest>,
) -> Result<StatusCode, AppError> {
    debug!("Update product request: {}", id);

    let id = ProductId::new(id);
    match state.product_service.update_product(id, request).await? {
        Some(_) => Ok(no_content()),
        None => Err(CatalogError::not_found(RESOURCE, id).into()),
    }
}

/// Delete a product.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = catalog_core::ErrorResponse)
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<StatusCode, AppError> {
    debug!("Delete product request: {}", id);

    let id = ProductId::new(id);
    if state.product_service.delete_product(id).await? {
        Ok(no_content())
    } else {
        Err(CatalogError::not_found(RESOURCE, id).into())
    }
}
