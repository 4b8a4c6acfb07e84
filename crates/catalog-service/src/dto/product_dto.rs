//! Product-related DTOs.

use catalog_core::rules::{not_blank, valid_price};
use catalog_core::{NewProduct, MAX_PRODUCT_NAME_LENGTH};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a new product.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Name must be at most 200 characters")
    )]
    #[schema(example = "Widget", max_length = 200)]
    pub name: String,

    #[validate(custom(function = "valid_price"))]
    #[schema(example = 9.99, minimum = 0)]
    pub price: f64,
}

/// Request to replace a product's name and price.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Name must be at most 200 characters")
    )]
    #[schema(example = "Widget", max_length = 200)]
    pub name: String,

    #[validate(custom(function = "valid_price"))]
    #[schema(example = 12.0, minimum = 0)]
    pub price: f64,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        Self::new(request.name, request.price)
    }
}

// The derive uses a literal; keep it tied to the domain constant.
const _: () = assert!(MAX_PRODUCT_NAME_LENGTH == 200);
