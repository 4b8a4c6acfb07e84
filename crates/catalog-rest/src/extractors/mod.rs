//! Custom Axum extractors.

mod json;
mod pagination;
mod params;

pub use json::*;
pub use pagination::*;
pub use params::*;
