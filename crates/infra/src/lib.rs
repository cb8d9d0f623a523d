//! Infrastructure layer: storage backends and the certificate engine.
//!
//! `store` holds the unit-of-work abstraction with its in-memory (tests/dev)
//! and Postgres backends; `engine` holds the components that run inside one
//! certificate transaction: correlative allocation, the stock ledger,
//! custody tracking, transfer resolution, and the workflow that drives them.

pub mod engine;
pub mod store;

#[cfg(test)]
mod integration_tests;
