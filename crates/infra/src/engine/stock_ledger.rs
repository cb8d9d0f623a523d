//! Stock changes paired with their ledger rows.
//!
//! Every change to a material's stock quantity goes through these two
//! functions, so a stock write and its history row can never come apart:
//! the ledger records the signed delta and the balance immediately after,
//! and replaying it reproduces the stored quantity exactly.

use brigada_core::UserId;
use brigada_inventory::{CertificateRef, Material, MaterialHistoryEntry, MovementKind};

use crate::store::InventoryTx;

use super::workflow::WorkflowError;

/// Remove `qty` from `material`'s stock and append the matching ledger row.
///
/// Fails with `InsufficientStock` before writing anything when the balance
/// cannot cover the removal.
pub async fn decrement<T: InventoryTx>(
    tx: &mut T,
    material: &Material,
    qty: i64,
    user_id: UserId,
    kind: MovementKind,
    certificate: CertificateRef,
    description: &str,
) -> Result<(), WorkflowError> {
    let balance = material.checked_decrement(qty)?;
    tx.set_stock(material.id, balance).await?;
    tx.append_history(&MaterialHistoryEntry::new(
        material.id,
        user_id,
        kind,
        -qty,
        balance,
        certificate,
        description,
    ))
    .await?;
    Ok(())
}

/// Add `qty` to `material`'s stock and append the matching ledger row.
pub async fn increment<T: InventoryTx>(
    tx: &mut T,
    material: &Material,
    qty: i64,
    user_id: UserId,
    kind: MovementKind,
    certificate: CertificateRef,
    description: &str,
) -> Result<(), WorkflowError> {
    let balance = material.stock_quantity + qty;
    tx.set_stock(material.id, balance).await?;
    tx.append_history(&MaterialHistoryEntry::new(
        material.id,
        user_id,
        kind,
        qty,
        balance,
        certificate,
        description,
    ))
    .await?;
    Ok(())
}
