//! Cache key generators for consistent key naming.

use catalog_core::ProductId;

/// Prefix shared by all product entries.
const PRODUCT_PREFIX: &str = "products-";

/// Generate the cache key for a product by ID.
#[must_use]
pub fn product_by_id(id: ProductId) -> String {
    format!("{PRODUCT_PREFIX}{id}")
}
