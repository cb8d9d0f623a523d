//! Certificate movement engine.
//!
//! Everything a delivery or reception certificate does to the inventory —
//! correlative allocation, stock moves with their ledger rows, custody
//! updates, cross-company transfer mirroring — happens here, inside one
//! store transaction per certificate. The engine is generic over
//! [`InventoryStore`](crate::store::InventoryStore), so the same workflow
//! runs against the in-memory store in tests and Postgres in production.

mod correlative;
mod custody;
mod stock_ledger;
mod transfer;
mod workflow;

pub use workflow::{CertificateWorkflow, WorkflowError};
