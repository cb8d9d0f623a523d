//! Certificate value model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use brigada_core::{CertificateId, Company, DomainError, DomainResult, FirefighterId, MaterialId, UserId};

/// The two paired document types. Deliveries move stock out of a company,
/// receptions move it back in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Delivery,
    Reception,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Delivery => "delivery",
            DocumentKind::Reception => "reception",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "delivery" => Ok(DocumentKind::Delivery),
            "reception" => Ok(DocumentKind::Reception),
            other => Err(DomainError::validation(format!(
                "unknown document kind '{other}'"
            ))),
        }
    }
}

/// Whether the material moves into a firefighter's personal custody or
/// stays at the company level.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentMode {
    /// Custody balances are touched for the counterpart firefighter.
    Firefighter,
    /// Company-level movement; custody is skipped entirely.
    Unit,
}

impl AssignmentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentMode::Firefighter => "firefighter",
            AssignmentMode::Unit => "unit",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "firefighter" => Ok(AssignmentMode::Firefighter),
            "unit" => Ok(AssignmentMode::Unit),
            other => Err(DomainError::validation(format!(
                "unknown assignment mode '{other}'"
            ))),
        }
    }
}

/// One material/quantity pair on a certificate. Created atomically with
/// the certificate, never independently mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateLine {
    pub material_id: MaterialId,
    pub quantity: i64,
}

/// Immutable record of a single delivery or reception event.
///
/// The correlative is unique, dense, and ascending within
/// `(company, kind)` and carries the human-facing document number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: CertificateId,
    pub kind: DocumentKind,
    pub company: Company,
    pub correlative: i64,
    pub firefighter_id: FirefighterId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub observations: Option<String>,
    pub assignment: AssignmentMode,
    pub lines: Vec<CertificateLine>,
}
