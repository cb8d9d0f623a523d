//! Boundary validation for certificate creation requests.
//!
//! Malformed requests are rejected here, before any transaction opens and
//! with no side effects.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use brigada_core::{Company, DomainError, DomainResult, FirefighterId, MaterialId};

use crate::certificate::AssignmentMode;

/// One requested material/quantity pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedLine {
    pub material_id: MaterialId,
    pub quantity: i64,
}

/// A validated request to create one delivery or reception certificate.
///
/// `company` is the *requested* target; the workflow resolves the
/// effective company from the acting context's privilege.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCertificateRequest {
    pub firefighter_id: FirefighterId,
    pub date: NaiveDate,
    pub observations: Option<String>,
    pub company: Company,
    pub assignment: AssignmentMode,
    pub items: Vec<RequestedLine>,
}

impl CreateCertificateRequest {
    /// Field-level validation: a non-empty line list and strictly positive
    /// quantities. Existence of the referenced rows is checked later,
    /// inside the transaction.
    pub fn validate(&self) -> DomainResult<()> {
        if self.items.is_empty() {
            return Err(DomainError::validation(
                "a certificate requires at least one line item",
            ));
        }
        for (idx, line) in self.items.iter().enumerate() {
            if line.quantity < 1 {
                return Err(DomainError::validation(format!(
                    "line {idx}: quantity must be a positive integer"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(items: Vec<RequestedLine>) -> CreateCertificateRequest {
        CreateCertificateRequest {
            firefighter_id: FirefighterId::new(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            observations: None,
            company: Company::Segunda,
            assignment: AssignmentMode::Unit,
            items,
        }
    }

    #[test]
    fn empty_line_list_is_rejected() {
        let err = request(vec![]).validate().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        for bad in [0, -1] {
            let req = request(vec![RequestedLine {
                material_id: MaterialId::new(),
                quantity: bad,
            }]);
            assert!(req.validate().is_err());
        }
    }

    #[test]
    fn positive_quantities_pass() {
        let req = request(vec![
            RequestedLine {
                material_id: MaterialId::new(),
                quantity: 1,
            },
            RequestedLine {
                material_id: MaterialId::new(),
                quantity: 40,
            },
        ]);
        assert!(req.validate().is_ok());
    }
}
