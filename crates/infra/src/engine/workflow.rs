//! Certificate creation workflow.
//!
//! One call, one store transaction: validation, correlative allocation,
//! the certificate row with its lines, and every stock/ledger/custody/
//! transfer effect commit together or not at all. A domain failure on any
//! line drops the transaction, so nothing of a rejected certificate —
//! including its correlative — is ever visible.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use brigada_certificates::{
    AssignmentMode, Certificate, CertificateLine, CreateCertificateRequest, DocumentKind,
};
use brigada_core::{ActingContext, CertificateId, Company, DomainError};
use brigada_inventory::{CertificateRef, Material, MovementKind};
use brigada_personnel::Firefighter;

use crate::store::{InventoryStore, InventoryTx, StoreError};

use super::{correlative, custody, stock_ledger, transfer};

/// Failure of a certificate workflow run.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A business rule rejected the certificate.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The store failed underneath the workflow.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Creates delivery and reception certificates against an inventory store.
pub struct CertificateWorkflow<S: InventoryStore> {
    store: Arc<S>,
}

impl<S: InventoryStore> Clone for CertificateWorkflow<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: InventoryStore> CertificateWorkflow<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create one certificate and apply all of its inventory effects.
    ///
    /// The certificate's company is the actor's effective company: elevated
    /// actors may target the requested one, everyone else is pinned to
    /// their own.
    #[instrument(
        skip(self, request),
        fields(kind = kind.as_str(), user_id = %ctx.user_id),
        err
    )]
    pub async fn create(
        &self,
        kind: DocumentKind,
        ctx: ActingContext,
        request: CreateCertificateRequest,
    ) -> Result<Certificate, WorkflowError> {
        request.validate()?;
        let company = ctx.effective_company(request.company);

        let mut tx = self.store.begin().await?;
        let certificate = Self::run(&mut tx, kind, ctx, company, request).await?;
        tx.commit().await?;

        tracing::info!(
            certificate_id = %certificate.id,
            company = %certificate.company,
            correlative = certificate.correlative,
            "certificate created"
        );
        Ok(certificate)
    }

    /// The transactional body. An `Err` here drops `tx` unchanged.
    async fn run<T: InventoryTx>(
        tx: &mut T,
        kind: DocumentKind,
        ctx: ActingContext,
        company: Company,
        request: CreateCertificateRequest,
    ) -> Result<Certificate, WorkflowError> {
        let firefighter = tx
            .firefighter(request.firefighter_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("firefighter {}", request.firefighter_id))
            })?;

        let correlative = correlative::next_correlative(tx, company, kind).await?;
        let certificate = Certificate {
            id: CertificateId::new(),
            kind,
            company,
            correlative,
            firefighter_id: firefighter.id,
            user_id: ctx.user_id,
            date: request.date,
            observations: request.observations,
            assignment: request.assignment,
            lines: request
                .items
                .iter()
                .map(|item| CertificateLine {
                    material_id: item.material_id,
                    quantity: item.quantity,
                })
                .collect(),
        };
        tx.insert_certificate(&certificate).await?;

        let cert_ref = match kind {
            DocumentKind::Delivery => CertificateRef::Delivery(certificate.id),
            DocumentKind::Reception => CertificateRef::Reception(certificate.id),
        };

        for line in &certificate.lines {
            let material = tx
                .material_for_update(line.material_id)
                .await?
                .ok_or_else(|| {
                    DomainError::not_found(format!("material {}", line.material_id))
                })?;

            match kind {
                DocumentKind::Delivery => {
                    Self::apply_delivery(tx, &certificate, &material, line.quantity, cert_ref)
                        .await?;
                }
                DocumentKind::Reception => {
                    Self::apply_reception(
                        tx,
                        &certificate,
                        &firefighter,
                        &material,
                        line.quantity,
                        cert_ref,
                    )
                    .await?;
                }
            }
        }

        Ok(certificate)
    }

    /// One delivery line: custody (when assigned to the firefighter), the
    /// stock decrement, and the inbound mirror when hub stock leaves for a
    /// branch company.
    async fn apply_delivery<T: InventoryTx>(
        tx: &mut T,
        certificate: &Certificate,
        material: &Material,
        qty: i64,
        cert_ref: CertificateRef,
    ) -> Result<(), WorkflowError> {
        if certificate.assignment == AssignmentMode::Firefighter {
            custody::take(tx, certificate.firefighter_id, material.id, qty).await?;
        }

        let description = format!(
            "Delivery certificate No. {} ({})",
            certificate.correlative, certificate.company
        );
        stock_ledger::decrement(
            tx,
            material,
            qty,
            certificate.user_id,
            MovementKind::Delivery,
            cert_ref,
            &description,
        )
        .await?;

        if material.company.is_hub() && !certificate.company.is_hub() {
            let description = format!(
                "Transfer in from {} (delivery certificate No. {})",
                material.company, certificate.correlative
            );
            transfer::mirror_incoming(
                tx,
                certificate.company,
                material,
                qty,
                certificate.user_id,
                cert_ref,
                &description,
            )
            .await?;
        }

        Ok(())
    }

    /// One reception line: the custody give-back (when assigned to the
    /// firefighter) or the outbound mirror (when the firefighter belongs
    /// to another company), then the stock increment on the receiving
    /// side.
    async fn apply_reception<T: InventoryTx>(
        tx: &mut T,
        certificate: &Certificate,
        firefighter: &Firefighter,
        material: &Material,
        qty: i64,
        cert_ref: CertificateRef,
    ) -> Result<(), WorkflowError> {
        let mut material = material.clone();
        if certificate.assignment == AssignmentMode::Firefighter {
            custody::give_back(tx, certificate.firefighter_id, material.id, qty).await?;
        } else if firefighter.company != certificate.company {
            let description = format!(
                "Transfer out to {} (reception certificate No. {})",
                certificate.company, certificate.correlative
            );
            transfer::mirror_outgoing(
                tx,
                firefighter.company,
                &material,
                qty,
                certificate.user_id,
                cert_ref,
                &description,
            )
            .await?;

            // The mirror may have drained this very row (the received
            // material can itself live in the firefighter's company).
            // Re-read so the increment starts from the drained balance.
            material = tx.material_for_update(material.id).await?.ok_or_else(|| {
                DomainError::not_found(format!("material {}", material.id))
            })?;
        }

        let description = format!(
            "Reception certificate No. {} ({})",
            certificate.correlative, certificate.company
        );
        stock_ledger::increment(
            tx,
            &material,
            qty,
            certificate.user_id,
            MovementKind::Reception,
            cert_ref,
            &description,
        )
        .await
    }
}
