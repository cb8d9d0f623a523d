//! Material: one stock-keeping line within one company.

use serde::{Deserialize, Serialize};

use brigada_core::{Company, DomainError, DomainResult, MaterialId};

/// One stock-keeping line within one company's inventory.
///
/// `stock_quantity` is never negative and is mutated only through the stock
/// ledger; materials are created by catalog management or by the transfer
/// resolver when an inbound transfer has no existing match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    pub company: Company,
    pub product_name: String,
    pub brand: String,
    pub model: String,
    /// Identity key across companies. Empty strings are treated as absent.
    pub code: Option<String>,
    pub stock_quantity: i64,
    pub category: String,
}

/// Key used to find "the same" material in another company's inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialLookup {
    /// Match on the product code.
    ByCode(String),
    /// Match on the compound descriptor key.
    ByDescriptor {
        product_name: String,
        brand: String,
        model: String,
    },
}

impl Material {
    /// The product code, with empty strings normalized away.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Descriptor lookup key for this material.
    pub fn descriptor_lookup(&self) -> MaterialLookup {
        MaterialLookup::ByDescriptor {
            product_name: self.product_name.clone(),
            brand: self.brand.clone(),
            model: self.model.clone(),
        }
    }

    /// Code lookup key, when this material carries a usable code.
    pub fn code_lookup(&self) -> Option<MaterialLookup> {
        self.code().map(|c| MaterialLookup::ByCode(c.to_string()))
    }

    /// Whether this material matches a lookup key (company is checked by
    /// the caller; lookups are always company-scoped).
    pub fn matches(&self, lookup: &MaterialLookup) -> bool {
        match lookup {
            MaterialLookup::ByCode(code) => self.code() == Some(code.as_str()),
            MaterialLookup::ByDescriptor {
                product_name,
                brand,
                model,
            } => {
                self.product_name == *product_name
                    && self.brand == *brand
                    && self.model == *model
            }
        }
    }

    /// The stock quantity after removing `qty`, or `InsufficientStock` when
    /// the balance cannot cover it.
    pub fn checked_decrement(&self, qty: i64) -> DomainResult<i64> {
        if self.stock_quantity < qty {
            return Err(DomainError::InsufficientStock {
                available: self.stock_quantity,
                requested: qty,
            });
        }
        Ok(self.stock_quantity - qty)
    }

    /// A copy of this material created in `company` by an inbound transfer,
    /// with a fresh identity and `initial_stock` as its starting balance.
    pub fn transfer_copy(&self, company: Company, initial_stock: i64) -> Material {
        Material {
            id: MaterialId::new(),
            company,
            product_name: self.product_name.clone(),
            brand: self.brand.clone(),
            model: self.model.clone(),
            code: self.code().map(str::to_string),
            stock_quantity: initial_stock,
            category: self.category.clone(),
        }
    }
}
