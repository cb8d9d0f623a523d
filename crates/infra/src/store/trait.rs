use async_trait::async_trait;
use thiserror::Error;

use brigada_certificates::{Certificate, DocumentKind};
use brigada_core::{CertificateId, Company, FirefighterId, MaterialId};
use brigada_inventory::{CustodyBalance, Material, MaterialHistoryEntry, MaterialLookup};
use brigada_personnel::Firefighter;

/// Storage operation error.
///
/// These are **infrastructure errors** (connectivity, queries, conflicting
/// writes) as opposed to domain errors (insufficient stock, missing
/// custody), which the engine raises itself.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage connection failed: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("conflicting write: {0}")]
    Conflict(String),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// One open certificate transaction.
///
/// Everything a certificate touches — the certificate row and its lines,
/// stock quantities, ledger rows, custody balances — goes through one
/// `InventoryTx`. Dropping the transaction without calling `commit` rolls
/// every write back; there is no partial-commit path.
///
/// ## Locking contract
///
/// `material_for_update` and `find_material_for_update` must return rows
/// locked for the remainder of the transaction (`SELECT ... FOR UPDATE`
/// semantics), so concurrent movements against the same material
/// serialize. `max_correlative` must serialize against concurrent
/// allocations for the same `(company, kind)` pair so two transactions can
/// never observe the same maximum.
#[async_trait]
pub trait InventoryTx: Send {
    /// Load a material by id, locking it for the rest of the transaction.
    async fn material_for_update(
        &mut self,
        id: MaterialId,
    ) -> Result<Option<Material>, StoreError>;

    /// Find a material in `company` by lookup key, locking any match.
    async fn find_material_for_update(
        &mut self,
        company: Company,
        lookup: &MaterialLookup,
    ) -> Result<Option<Material>, StoreError>;

    /// Create a material (transfer resolver, inbound side only).
    async fn insert_material(&mut self, material: &Material) -> Result<(), StoreError>;

    /// Write a material's stock quantity.
    async fn set_stock(&mut self, id: MaterialId, stock: i64) -> Result<(), StoreError>;

    /// Append one ledger row. Append-only; rows are never touched again.
    async fn append_history(&mut self, entry: &MaterialHistoryEntry) -> Result<(), StoreError>;

    /// Highest correlative assigned so far for `(company, kind)`, 0 if none.
    async fn max_correlative(
        &mut self,
        company: Company,
        kind: DocumentKind,
    ) -> Result<i64, StoreError>;

    /// Insert the certificate row and its line items.
    async fn insert_certificate(&mut self, certificate: &Certificate) -> Result<(), StoreError>;

    /// Load a firefighter by id.
    async fn firefighter(&mut self, id: FirefighterId) -> Result<Option<Firefighter>, StoreError>;

    /// Load the custody balance for a (firefighter, material) pair.
    async fn custody(
        &mut self,
        firefighter_id: FirefighterId,
        material_id: MaterialId,
    ) -> Result<Option<CustodyBalance>, StoreError>;

    /// Create or overwrite the custody balance for its pair.
    async fn upsert_custody(&mut self, balance: &CustodyBalance) -> Result<(), StoreError>;

    /// Commit every write of this transaction atomically.
    async fn commit(self) -> Result<(), StoreError>;
}

/// Handle to the inventory store.
///
/// `begin` opens a certificate transaction; the remaining methods are
/// read-only queries answered outside any transaction (listing views,
/// lookups). Implementations must be cheap to clone/share across request
/// handlers.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    type Tx: InventoryTx;

    async fn begin(&self) -> Result<Self::Tx, StoreError>;

    async fn material(&self, id: MaterialId) -> Result<Option<Material>, StoreError>;

    /// A material's ledger rows in creation order.
    async fn material_history(
        &self,
        id: MaterialId,
    ) -> Result<Vec<MaterialHistoryEntry>, StoreError>;

    async fn certificate(
        &self,
        id: CertificateId,
    ) -> Result<Option<Certificate>, StoreError>;

    /// Certificates of one company and kind, ascending by correlative.
    async fn certificates(
        &self,
        company: Company,
        kind: DocumentKind,
    ) -> Result<Vec<Certificate>, StoreError>;

    async fn firefighter(&self, id: FirefighterId) -> Result<Option<Firefighter>, StoreError>;

    /// Everything a firefighter currently holds.
    async fn custody_for(
        &self,
        firefighter_id: FirefighterId,
    ) -> Result<Vec<CustodyBalance>, StoreError>;
}
