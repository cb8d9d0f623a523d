use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use brigada_certificates::{Certificate, DocumentKind};
use brigada_core::{CertificateId, Company, FirefighterId, MaterialId};
use brigada_inventory::{CustodyBalance, Material, MaterialHistoryEntry, MaterialLookup};
use brigada_personnel::Firefighter;

use super::r#trait::{InventoryStore, InventoryTx, StoreError};

#[derive(Debug, Clone, Default)]
struct StoreState {
    materials: HashMap<MaterialId, Material>,
    history: Vec<MaterialHistoryEntry>,
    certificates: Vec<Certificate>,
    custody: HashMap<(FirefighterId, MaterialId), CustodyBalance>,
    firefighters: HashMap<FirefighterId, Firefighter>,
}

/// In-memory inventory store.
///
/// Intended for tests/dev. Transactions take the whole-store lock at
/// `begin` and mutate a working copy; `commit` swaps the copy in, dropping
/// the transaction discards it. Holding the lock for the transaction's
/// lifetime serializes concurrent certificates, which is the same
/// observable discipline the Postgres backend gets from row locks, just
/// coarser.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a material (catalog management stand-in for tests/dev).
    pub async fn seed_material(&self, material: Material) {
        self.state
            .lock()
            .await
            .materials
            .insert(material.id, material);
    }

    /// Seed a firefighter.
    pub async fn seed_firefighter(&self, firefighter: Firefighter) {
        self.state
            .lock()
            .await
            .firefighters
            .insert(firefighter.id, firefighter);
    }

    /// Seed a custody balance.
    pub async fn seed_custody(&self, balance: CustodyBalance) {
        self.state
            .lock()
            .await
            .custody
            .insert((balance.firefighter_id, balance.material_id), balance);
    }
}

/// One open transaction against the in-memory store.
pub struct InMemoryTx {
    guard: OwnedMutexGuard<StoreState>,
    working: StoreState,
}

impl InMemoryTx {
    /// Deterministic pick among descriptor matches: lowest id wins.
    fn find_in(state: &StoreState, company: Company, lookup: &MaterialLookup) -> Option<Material> {
        let mut matches: Vec<&Material> = state
            .materials
            .values()
            .filter(|m| m.company == company && m.matches(lookup))
            .collect();
        matches.sort_by_key(|m| *m.id.as_uuid());
        matches.first().map(|m| (*m).clone())
    }
}

#[async_trait]
impl InventoryTx for InMemoryTx {
    async fn material_for_update(
        &mut self,
        id: MaterialId,
    ) -> Result<Option<Material>, StoreError> {
        Ok(self.working.materials.get(&id).cloned())
    }

    async fn find_material_for_update(
        &mut self,
        company: Company,
        lookup: &MaterialLookup,
    ) -> Result<Option<Material>, StoreError> {
        Ok(Self::find_in(&self.working, company, lookup))
    }

    async fn insert_material(&mut self, material: &Material) -> Result<(), StoreError> {
        if self.working.materials.contains_key(&material.id) {
            return Err(StoreError::Conflict(format!(
                "material {} already exists",
                material.id
            )));
        }
        self.working
            .materials
            .insert(material.id, material.clone());
        Ok(())
    }

    async fn set_stock(&mut self, id: MaterialId, stock: i64) -> Result<(), StoreError> {
        let material = self
            .working
            .materials
            .get_mut(&id)
            .ok_or_else(|| StoreError::Query(format!("material {id} does not exist")))?;
        material.stock_quantity = stock;
        Ok(())
    }

    async fn append_history(&mut self, entry: &MaterialHistoryEntry) -> Result<(), StoreError> {
        self.working.history.push(entry.clone());
        Ok(())
    }

    async fn max_correlative(
        &mut self,
        company: Company,
        kind: DocumentKind,
    ) -> Result<i64, StoreError> {
        Ok(self
            .working
            .certificates
            .iter()
            .filter(|c| c.company == company && c.kind == kind)
            .map(|c| c.correlative)
            .max()
            .unwrap_or(0))
    }

    async fn insert_certificate(&mut self, certificate: &Certificate) -> Result<(), StoreError> {
        let duplicate = self.working.certificates.iter().any(|c| {
            c.id == certificate.id
                || (c.company == certificate.company
                    && c.kind == certificate.kind
                    && c.correlative == certificate.correlative)
        });
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "certificate {} {}/{} already exists",
                certificate.kind.as_str(),
                certificate.company,
                certificate.correlative
            )));
        }
        self.working.certificates.push(certificate.clone());
        Ok(())
    }

    async fn firefighter(&mut self, id: FirefighterId) -> Result<Option<Firefighter>, StoreError> {
        Ok(self.working.firefighters.get(&id).cloned())
    }

    async fn custody(
        &mut self,
        firefighter_id: FirefighterId,
        material_id: MaterialId,
    ) -> Result<Option<CustodyBalance>, StoreError> {
        Ok(self
            .working
            .custody
            .get(&(firefighter_id, material_id))
            .cloned())
    }

    async fn upsert_custody(&mut self, balance: &CustodyBalance) -> Result<(), StoreError> {
        self.working
            .custody
            .insert((balance.firefighter_id, balance.material_id), balance.clone());
        Ok(())
    }

    async fn commit(mut self) -> Result<(), StoreError> {
        *self.guard = self.working;
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for InMemoryStore {
    type Tx = InMemoryTx;

    async fn begin(&self) -> Result<Self::Tx, StoreError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(InMemoryTx { guard, working })
    }

    async fn material(&self, id: MaterialId) -> Result<Option<Material>, StoreError> {
        Ok(self.state.lock().await.materials.get(&id).cloned())
    }

    async fn material_history(
        &self,
        id: MaterialId,
    ) -> Result<Vec<MaterialHistoryEntry>, StoreError> {
        Ok(self
            .state
            .lock()
            .await
            .history
            .iter()
            .filter(|e| e.material_id == id)
            .cloned()
            .collect())
    }

    async fn certificate(&self, id: CertificateId) -> Result<Option<Certificate>, StoreError> {
        Ok(self
            .state
            .lock()
            .await
            .certificates
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn certificates(
        &self,
        company: Company,
        kind: DocumentKind,
    ) -> Result<Vec<Certificate>, StoreError> {
        let mut certs: Vec<Certificate> = self
            .state
            .lock()
            .await
            .certificates
            .iter()
            .filter(|c| c.company == company && c.kind == kind)
            .cloned()
            .collect();
        certs.sort_by_key(|c| c.correlative);
        Ok(certs)
    }

    async fn firefighter(&self, id: FirefighterId) -> Result<Option<Firefighter>, StoreError> {
        Ok(self.state.lock().await.firefighters.get(&id).cloned())
    }

    async fn custody_for(
        &self,
        firefighter_id: FirefighterId,
    ) -> Result<Vec<CustodyBalance>, StoreError> {
        let mut balances: Vec<CustodyBalance> = self
            .state
            .lock()
            .await
            .custody
            .values()
            .filter(|b| b.firefighter_id == firefighter_id)
            .cloned()
            .collect();
        balances.sort_by_key(|b| *b.material_id.as_uuid());
        Ok(balances)
    }
}
