//! # Catalog Resilience
//!
//! Resilience patterns for Catalog Cloud: retry with exponential backoff and
//! timeouts for async operations.

pub mod retry;
pub mod timeout;

pub use retry::*;
pub use timeout::*;
