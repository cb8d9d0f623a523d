//! Custody balance updates inside a certificate transaction.

use brigada_core::{DomainError, FirefighterId, MaterialId};
use brigada_inventory::CustodyBalance;

use crate::store::InventoryTx;

use super::workflow::WorkflowError;

/// Hand `qty` of a material to a firefighter.
///
/// Opens the custody balance on first delivery; accumulates afterwards.
pub async fn take<T: InventoryTx>(
    tx: &mut T,
    firefighter_id: FirefighterId,
    material_id: MaterialId,
    qty: i64,
) -> Result<(), WorkflowError> {
    let balance = match tx.custody(firefighter_id, material_id).await? {
        Some(mut balance) => {
            balance.take(qty);
            balance
        }
        None => CustodyBalance::opened(firefighter_id, material_id, qty),
    };
    tx.upsert_custody(&balance).await?;
    Ok(())
}

/// Take back `qty` of a material from a firefighter.
///
/// Fails with `MissingAssignment` when the firefighter was never handed
/// this material, and with `InsufficientCustody` when they hold less than
/// `qty`.
pub async fn give_back<T: InventoryTx>(
    tx: &mut T,
    firefighter_id: FirefighterId,
    material_id: MaterialId,
    qty: i64,
) -> Result<(), WorkflowError> {
    let mut balance = tx
        .custody(firefighter_id, material_id)
        .await?
        .ok_or(DomainError::MissingAssignment)?;
    balance.give_back(qty)?;
    tx.upsert_custody(&balance).await?;
    Ok(())
}
