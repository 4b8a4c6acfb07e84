//! Data Transfer Objects (DTOs).

mod health_dto;
mod product_dto;

pub use health_dto::*;
pub use product_dto::*;
