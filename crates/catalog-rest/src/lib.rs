//! # Catalog REST
//!
//! REST API layer using Axum for Catalog Cloud.
//! Provides HTTP endpoints for product management, health checks, and metrics.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
