//! Per-firefighter custody of material.

use serde::{Deserialize, Serialize};

use brigada_core::{DomainError, DomainResult, FirefighterId, MaterialId};

/// How much of one material one firefighter currently holds.
///
/// Created on first delivery to the firefighter; the quantity never drops
/// below zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyBalance {
    pub firefighter_id: FirefighterId,
    pub material_id: MaterialId,
    pub quantity: i64,
}

impl CustodyBalance {
    /// A fresh balance opened by a first delivery.
    pub fn opened(firefighter_id: FirefighterId, material_id: MaterialId, quantity: i64) -> Self {
        Self {
            firefighter_id,
            material_id,
            quantity,
        }
    }

    /// Hand `qty` more of the material to the firefighter.
    pub fn take(&mut self, qty: i64) {
        self.quantity += qty;
    }

    /// Return `qty` of the material to company stock.
    ///
    /// Fails with `InsufficientCustody` when the firefighter does not hold
    /// that much; the balance is left untouched on failure.
    pub fn give_back(&mut self, qty: i64) -> DomainResult<()> {
        if self.quantity < qty {
            return Err(DomainError::InsufficientCustody {
                available: self.quantity,
                requested: qty,
            });
        }
        self.quantity -= qty;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn take_accumulates() {
        let mut b = CustodyBalance::opened(FirefighterId::new(), MaterialId::new(), 2);
        b.take(3);
        assert_eq!(b.quantity, 5);
    }

    #[test]
    fn give_back_rejects_overdraw_and_leaves_balance_unchanged() {
        let mut b = CustodyBalance::opened(FirefighterId::new(), MaterialId::new(), 2);
        let err = b.give_back(3).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientCustody {
                available: 2,
                requested: 3
            }
        );
        assert_eq!(b.quantity, 2);
    }

    proptest! {
        /// No interleaving of takes and give-backs drives custody negative.
        #[test]
        fn custody_never_goes_negative(ops in prop::collection::vec((any::<bool>(), 1i64..20), 0..64)) {
            let mut b = CustodyBalance::opened(FirefighterId::new(), MaterialId::new(), 0);
            for (is_take, qty) in ops {
                if is_take {
                    b.take(qty);
                } else {
                    let _ = b.give_back(qty);
                }
                prop_assert!(b.quantity >= 0);
            }
        }
    }
}
