//! Domain layer: entities of the product catalog.

pub mod entities;

pub use entities::*;
