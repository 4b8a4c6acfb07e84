//! # Catalog Service
//!
//! Business logic service layer for Catalog Cloud.
//!
//! [`ProductServiceImpl`] sits between the REST layer and the product store and
//! serves reads through a [`ReadThroughCache`]. Writes always go to the store
//! first and then invalidate the product's cache key.

pub mod cache;
pub mod dto;
pub mod metrics;
pub mod product_service;
pub mod r#impl;

pub use cache::*;
pub use dto::*;
pub use product_service::*;
pub use r#impl::*;
