//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, stock/custody shortfalls). Infrastructure concerns belong
/// elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced material or firefighter does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Authorization failure at the domain boundary.
    #[error("unauthorized")]
    Unauthorized,

    /// A stock decrement would drive the material balance below zero.
    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i64, requested: i64 },

    /// A reception references a (firefighter, material) custody pair that
    /// does not exist.
    #[error("no custody balance for the referenced firefighter and material")]
    MissingAssignment,

    /// A reception would drive a custody balance below zero.
    #[error("insufficient custody: {available} held, {requested} returned")]
    InsufficientCustody { available: i64, requested: i64 },

    /// A cross-company return found no matching material in the source
    /// company's inventory. Fail-closed: the whole certificate aborts.
    #[error("no transfer source match in '{company}' for '{product_name}'")]
    MissingTransferSource {
        company: String,
        product_name: String,
    },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
