//! Cross-company transfer mirroring.
//!
//! A delivery of hub stock to a branch company, or a branch firefighter's
//! return received at another company, moves material *between* company
//! inventories. The counterpart row on the other side is resolved by
//! supplier code first and by `(product_name, brand, model)` as a
//! fallback.
//!
//! The two directions are deliberately asymmetric. Inbound (hub delivery
//! to a branch) creates the branch-side material when no match exists.
//! Outbound (return of another company's material) fails closed with
//! `MissingTransferSource` instead of guessing which source row to drain,
//! aborting the whole certificate.

use brigada_core::{Company, DomainError, UserId};
use brigada_inventory::{CertificateRef, Material, MaterialHistoryEntry, MovementKind};

use crate::store::{InventoryTx, StoreError};

use super::stock_ledger;
use super::workflow::WorkflowError;

/// Resolve `material`'s counterpart in `company`: by code when the
/// material carries one, by descriptor otherwise or when the code finds
/// nothing. The match is locked for the rest of the transaction.
async fn find_match<T: InventoryTx>(
    tx: &mut T,
    company: Company,
    material: &Material,
) -> Result<Option<Material>, StoreError> {
    if let Some(lookup) = material.code_lookup() {
        if let Some(found) = tx.find_material_for_update(company, &lookup).await? {
            return Ok(Some(found));
        }
    }
    tx.find_material_for_update(company, &material.descriptor_lookup())
        .await
}

/// Mirror a hub delivery into `destination`'s inventory.
///
/// Increments the matching destination material, or creates a copy with
/// `qty` as its opening balance when the destination has never stocked
/// this item.
pub async fn mirror_incoming<T: InventoryTx>(
    tx: &mut T,
    destination: Company,
    source: &Material,
    qty: i64,
    user_id: UserId,
    certificate: CertificateRef,
    description: &str,
) -> Result<(), WorkflowError> {
    match find_match(tx, destination, source).await? {
        Some(existing) => {
            stock_ledger::increment(
                tx,
                &existing,
                qty,
                user_id,
                MovementKind::TransferIn,
                certificate,
                description,
            )
            .await
        }
        None => {
            let copy = source.transfer_copy(destination, qty);
            tx.insert_material(&copy).await?;
            tx.append_history(&MaterialHistoryEntry::new(
                copy.id,
                user_id,
                MovementKind::TransferIn,
                qty,
                qty,
                certificate,
                description,
            ))
            .await?;
            Ok(())
        }
    }
}

/// Mirror a cross-company return out of `source_company`'s inventory.
///
/// Decrements the matching source material; when no counterpart exists the
/// certificate aborts with `MissingTransferSource` rather than leaving the
/// source side unreconciled.
pub async fn mirror_outgoing<T: InventoryTx>(
    tx: &mut T,
    source_company: Company,
    returned: &Material,
    qty: i64,
    user_id: UserId,
    certificate: CertificateRef,
    description: &str,
) -> Result<(), WorkflowError> {
    match find_match(tx, source_company, returned).await? {
        Some(existing) => {
            stock_ledger::decrement(
                tx,
                &existing,
                qty,
                user_id,
                MovementKind::TransferOut,
                certificate,
                description,
            )
            .await
        }
        None => Err(DomainError::MissingTransferSource {
            company: source_company.to_string(),
            product_name: returned.product_name.clone(),
        }
        .into()),
    }
}
