//! Database layer - store abstraction, connection pool and repositories
//!
//! # Design Principles
//!
//! - Handlers depend on `dyn Store`, never on a global connection
//! - Connection pool with explicit limits
//! - Embedded collections are batch loaded - no N+1 queries
//! - Check-then-write sequences run inside one transaction

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod postgres;
pub mod repos;
pub mod store;

pub use error::DbError;
pub use memory::MemoryStore;
pub use pool::{connect, PoolSettings};
pub use postgres::PgStore;
pub use store::Store;
