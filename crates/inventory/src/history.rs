//! The append-only movement ledger.
//!
//! Every stock change appends exactly one `MaterialHistoryEntry`; rows are
//! never updated or deleted. Replaying a material's entries in creation
//! order must reproduce every recorded balance, and the last balance must
//! equal the material's current stock quantity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use brigada_core::{CertificateId, DomainError, DomainResult, MaterialId, UserId};

/// Why a stock quantity changed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Stock returned to a company by a reception certificate.
    Reception,
    /// Stock left a company by a delivery certificate.
    Delivery,
    /// Mirrored increment in the destination company of a transfer.
    TransferIn,
    /// Mirrored decrement in the source company of a transfer.
    TransferOut,
    /// Manual catalog addition.
    Add,
    /// Manual catalog removal.
    Remove,
    /// Manual catalog correction.
    Edit,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Reception => "reception",
            MovementKind::Delivery => "delivery",
            MovementKind::TransferIn => "transfer_in",
            MovementKind::TransferOut => "transfer_out",
            MovementKind::Add => "add",
            MovementKind::Remove => "remove",
            MovementKind::Edit => "edit",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "reception" => Ok(MovementKind::Reception),
            "delivery" => Ok(MovementKind::Delivery),
            "transfer_in" => Ok(MovementKind::TransferIn),
            "transfer_out" => Ok(MovementKind::TransferOut),
            "add" => Ok(MovementKind::Add),
            "remove" => Ok(MovementKind::Remove),
            "edit" => Ok(MovementKind::Edit),
            other => Err(DomainError::validation(format!(
                "unknown movement kind '{other}'"
            ))),
        }
    }
}

/// Reference from a ledger row to the document that caused it.
///
/// A tagged variant instead of an untyped (type-name, id) pair, so
/// resolution is exhaustively checked.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CertificateRef {
    /// No originating document (legacy rows).
    None,
    Delivery(CertificateId),
    Reception(CertificateId),
    /// A manual stock edit with no certificate.
    ManualEdit,
}

impl CertificateRef {
    /// The kind discriminant as stored in the `certificate_kind` column.
    pub fn kind_str(&self) -> Option<&'static str> {
        match self {
            CertificateRef::None => None,
            CertificateRef::Delivery(_) => Some("delivery"),
            CertificateRef::Reception(_) => Some("reception"),
            CertificateRef::ManualEdit => Some("manual_edit"),
        }
    }

    pub fn certificate_id(&self) -> Option<CertificateId> {
        match self {
            CertificateRef::Delivery(id) | CertificateRef::Reception(id) => Some(*id),
            CertificateRef::None | CertificateRef::ManualEdit => None,
        }
    }

    /// Rebuild the reference from its storage columns.
    pub fn from_columns(kind: Option<&str>, id: Option<Uuid>) -> DomainResult<Self> {
        match (kind, id) {
            (None, _) => Ok(CertificateRef::None),
            (Some("manual_edit"), _) => Ok(CertificateRef::ManualEdit),
            (Some("delivery"), Some(id)) => {
                Ok(CertificateRef::Delivery(CertificateId::from_uuid(id)))
            }
            (Some("reception"), Some(id)) => {
                Ok(CertificateRef::Reception(CertificateId::from_uuid(id)))
            }
            (Some(kind), None) => Err(DomainError::validation(format!(
                "certificate reference '{kind}' is missing its id"
            ))),
            (Some(kind), _) => Err(DomainError::validation(format!(
                "unknown certificate reference kind '{kind}'"
            ))),
        }
    }
}

/// One immutable ledger row: a stock change, its cause, and the resulting
/// balance at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialHistoryEntry {
    pub id: Uuid,
    pub material_id: MaterialId,
    pub user_id: UserId,
    pub kind: MovementKind,
    /// Signed delta applied to the stock quantity.
    pub quantity_change: i64,
    /// Stock quantity immediately after this change.
    pub current_balance: i64,
    pub certificate: CertificateRef,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl MaterialHistoryEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        material_id: MaterialId,
        user_id: UserId,
        kind: MovementKind,
        quantity_change: i64,
        current_balance: i64,
        certificate: CertificateRef,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            material_id,
            user_id,
            kind,
            quantity_change,
            current_balance,
            certificate,
            description: description.into(),
            created_at: Utc::now(),
        }
    }
}

/// Replay a material's ledger in creation order.
///
/// Verifies that summing `quantity_change` reproduces every recorded
/// `current_balance` and that no balance ever drops below zero. Returns the
/// final balance (0 for an empty ledger).
pub fn replay_ledger(entries: &[MaterialHistoryEntry]) -> DomainResult<i64> {
    let mut balance = 0i64;
    for entry in entries {
        balance += entry.quantity_change;
        if balance != entry.current_balance {
            return Err(DomainError::validation(format!(
                "ledger divergence at entry {}: replay gives {balance}, row records {}",
                entry.id, entry.current_balance
            )));
        }
        if balance < 0 {
            return Err(DomainError::validation(format!(
                "ledger drops below zero at entry {}",
                entry.id
            )));
        }
    }
    Ok(balance)
}
