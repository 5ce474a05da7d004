//! Product storage boundary.
//!
//! A narrow CRUD + offset-pagination contract with two implementations: Postgres
//! for production and an in-memory map for tests/dev.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;
pub use r#trait::{ProductStore, StoreError};
