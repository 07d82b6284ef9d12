//! # Stash Repository
//!
//! The record store: authoritative storage for user records.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserRepository>
//! MySqlUserRepository  |  InMemoryUserRepository
//!   ↓  Arc<dyn DatabasePoolInterface>
//! MySQL
//! ```

pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

pub use memory::InMemoryUserRepository;
pub use mysql::*;
pub use pool::*;
pub use traits::*;
