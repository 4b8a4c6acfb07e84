//! # Catalog Repository
//!
//! Product store for Catalog Cloud.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn ProductRepository>
//! MySqlProductRepository | InMemoryProductRepository
//!   ↓  Arc<dyn DatabasePoolInterface>
//! MySQL
//! ```

pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

pub use memory::*;
pub use mysql::*;
pub use pool::*;
pub use traits::*;
