//! Per-company, per-kind correlative allocation.
//!
//! Certificates of one `(company, kind)` pair are numbered densely from 1
//! with no gaps and no reuse. The number is derived from stored rows at
//! creation time — max plus one — never from a counter that could drift
//! from the table. Serialization against concurrent allocations is the
//! store's obligation (see the locking contract on
//! [`InventoryTx`](crate::store::InventoryTx)); density follows because a
//! failed certificate commits nothing.

use brigada_certificates::DocumentKind;
use brigada_core::Company;

use crate::store::{InventoryTx, StoreError};

/// The next correlative for `(company, kind)`.
pub async fn next_correlative<T: InventoryTx>(
    tx: &mut T,
    company: Company,
    kind: DocumentKind,
) -> Result<i64, StoreError> {
    Ok(tx.max_correlative(company, kind).await? + 1)
}
