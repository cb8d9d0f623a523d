//! `brigada-inventory` — material stock, the movement ledger, and custody.
//!
//! Pure domain types and invariant checks. All mutation of persisted stock
//! goes through the engine in `brigada-infra`; this crate owns the shapes
//! and the rules.

pub mod custody;
pub mod history;
pub mod material;

pub use custody::CustodyBalance;
pub use history::{CertificateRef, MaterialHistoryEntry, MovementKind, replay_ledger};
pub use material::{Material, MaterialLookup};
