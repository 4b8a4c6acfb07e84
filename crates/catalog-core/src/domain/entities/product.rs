//! Product entity.

use crate::ProductId;
use serde::{Deserialize, Serialize};

/// Maximum length of a product name, in characters.
pub const MAX_PRODUCT_NAME_LENGTH: usize = 200;

/// A product stored in the catalog.
///
/// The store is authoritative for products. Cached copies are time-bounded and
/// only ever replaced by reloading from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Product {
    /// Store-assigned identifier.
    pub id: ProductId,

    /// Display name. Never blank, at most 200 characters.
    pub name: String,

    /// Unit price. Finite and non-negative.
    pub price: f64,
}

impl Product {
    /// Creates a product from its stored parts.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
        }
    }

    /// Replaces name and price, keeping the identifier.
    pub fn replace(&mut self, name: impl Into<String>, price: f64) {
        self.name = name.into();
        self.price = price;
    }
}

/// A product that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
}

impl NewProduct {
    #[must_use]
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    /// Attaches a store-assigned identifier.
    #[must_use]
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
        }
    }
}
