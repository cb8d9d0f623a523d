//! Inventory storage boundary.
//!
//! This module defines the unit-of-work abstraction the certificate engine
//! runs against, without making any storage assumptions, plus the two
//! backends: in-memory (tests/dev) and Postgres.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use postgres::PgInventoryStore;
pub use r#trait::{InventoryStore, InventoryTx, StoreError};
