use std::sync::Arc;

use sqlx::PgPool;

use brigada_certificates::{Certificate, CreateCertificateRequest, DocumentKind};
use brigada_core::{ActingContext, CertificateId, Company, FirefighterId, MaterialId};
use brigada_infra::engine::{CertificateWorkflow, WorkflowError};
use brigada_infra::store::{
    InMemoryStore, InventoryStore, PgInventoryStore, StoreError,
};
use brigada_inventory::{CustodyBalance, Material, MaterialHistoryEntry};
use brigada_personnel::Firefighter;

/// The wired store + workflow pair the handlers run against.
///
/// One variant per backend; `build_services` picks at startup. Handlers
/// only see the dispatch methods below, so they are backend-agnostic.
#[derive(Clone)]
pub enum AppServices {
    InMemory {
        store: Arc<InMemoryStore>,
        workflow: CertificateWorkflow<InMemoryStore>,
    },
    Persistent {
        store: Arc<PgInventoryStore>,
        workflow: CertificateWorkflow<PgInventoryStore>,
    },
}

pub async fn build_services() -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    if use_persistent {
        return build_persistent_services().await;
    }

    build_in_memory_services()
}

fn build_in_memory_services() -> AppServices {
    let store = Arc::new(InMemoryStore::new());
    let workflow = CertificateWorkflow::new(Arc::clone(&store));
    tracing::info!("using in-memory inventory store");
    AppServices::InMemory { store, workflow }
}

async fn build_persistent_services() -> AppServices {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");
    let pool = PgPool::connect(&url)
        .await
        .expect("failed to connect to Postgres");
    let store = Arc::new(PgInventoryStore::new(pool));
    let workflow = CertificateWorkflow::new(Arc::clone(&store));
    tracing::info!("using Postgres inventory store");
    AppServices::Persistent { store, workflow }
}

impl AppServices {
    pub async fn create_certificate(
        &self,
        kind: DocumentKind,
        ctx: ActingContext,
        request: CreateCertificateRequest,
    ) -> Result<Certificate, WorkflowError> {
        match self {
            AppServices::InMemory { workflow, .. } => workflow.create(kind, ctx, request).await,
            AppServices::Persistent { workflow, .. } => workflow.create(kind, ctx, request).await,
        }
    }

    pub async fn material(&self, id: MaterialId) -> Result<Option<Material>, StoreError> {
        match self {
            AppServices::InMemory { store, .. } => store.material(id).await,
            AppServices::Persistent { store, .. } => store.material(id).await,
        }
    }

    pub async fn material_history(
        &self,
        id: MaterialId,
    ) -> Result<Vec<MaterialHistoryEntry>, StoreError> {
        match self {
            AppServices::InMemory { store, .. } => store.material_history(id).await,
            AppServices::Persistent { store, .. } => store.material_history(id).await,
        }
    }

    pub async fn certificate(
        &self,
        id: CertificateId,
    ) -> Result<Option<Certificate>, StoreError> {
        match self {
            AppServices::InMemory { store, .. } => store.certificate(id).await,
            AppServices::Persistent { store, .. } => store.certificate(id).await,
        }
    }

    pub async fn certificates(
        &self,
        company: Company,
        kind: DocumentKind,
    ) -> Result<Vec<Certificate>, StoreError> {
        match self {
            AppServices::InMemory { store, .. } => store.certificates(company, kind).await,
            AppServices::Persistent { store, .. } => store.certificates(company, kind).await,
        }
    }

    pub async fn firefighter(
        &self,
        id: FirefighterId,
    ) -> Result<Option<Firefighter>, StoreError> {
        match self {
            AppServices::InMemory { store, .. } => store.firefighter(id).await,
            AppServices::Persistent { store, .. } => store.firefighter(id).await,
        }
    }

    pub async fn custody_for(
        &self,
        firefighter_id: FirefighterId,
    ) -> Result<Vec<CustodyBalance>, StoreError> {
        match self {
            AppServices::InMemory { store, .. } => store.custody_for(firefighter_id).await,
            AppServices::Persistent { store, .. } => store.custody_for(firefighter_id).await,
        }
    }

}
