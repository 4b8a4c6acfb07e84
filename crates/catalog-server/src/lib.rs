//! # Catalog Server Library
//!
//! Dependency wiring and startup utilities for the Catalog Cloud server.

pub mod di;
pub mod startup;
