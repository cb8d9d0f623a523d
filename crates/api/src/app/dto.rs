//! Request/response DTOs and their mapping to domain types.
//!
//! Identifiers and enums arrive as strings and are parsed here, so a
//! malformed value produces a 400 with our JSON error shape instead of an
//! axum rejection.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use brigada_certificates::{
    AssignmentMode, Certificate, CreateCertificateRequest, RequestedLine,
};
use brigada_core::{Company, DomainError, FirefighterId, MaterialId};
use brigada_inventory::{CustodyBalance, Material, MaterialHistoryEntry};

#[derive(Debug, Deserialize)]
pub struct CreateCertificateBody {
    pub firefighter_id: String,
    pub date: NaiveDate,
    pub observations: Option<String>,
    pub company: String,
    pub assignment: String,
    pub items: Vec<LineBody>,
}

#[derive(Debug, Deserialize)]
pub struct LineBody {
    pub material_id: String,
    pub quantity: i64,
}

impl CreateCertificateBody {
    pub fn into_domain(self) -> Result<CreateCertificateRequest, DomainError> {
        let firefighter_id: FirefighterId = self.firefighter_id.parse()?;
        let company: Company = self.company.parse()?;
        let assignment = AssignmentMode::parse(&self.assignment)?;
        let items = self
            .items
            .into_iter()
            .map(|line| {
                Ok(RequestedLine {
                    material_id: line.material_id.parse::<MaterialId>()?,
                    quantity: line.quantity,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(CreateCertificateRequest {
            firefighter_id,
            date: self.date,
            observations: self.observations,
            company,
            assignment,
            items,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CertificateResponse {
    pub id: String,
    pub kind: &'static str,
    pub company: &'static str,
    pub correlative: i64,
    pub firefighter_id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub observations: Option<String>,
    pub assignment: &'static str,
    pub items: Vec<LineResponse>,
}

#[derive(Debug, Serialize)]
pub struct LineResponse {
    pub material_id: String,
    pub quantity: i64,
}

impl From<&Certificate> for CertificateResponse {
    fn from(certificate: &Certificate) -> Self {
        Self {
            id: certificate.id.to_string(),
            kind: certificate.kind.as_str(),
            company: certificate.company.as_str(),
            correlative: certificate.correlative,
            firefighter_id: certificate.firefighter_id.to_string(),
            user_id: certificate.user_id.to_string(),
            date: certificate.date,
            observations: certificate.observations.clone(),
            assignment: certificate.assignment.as_str(),
            items: certificate
                .lines
                .iter()
                .map(|line| LineResponse {
                    material_id: line.material_id.to_string(),
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MaterialResponse {
    pub id: String,
    pub company: &'static str,
    pub product_name: String,
    pub brand: String,
    pub model: String,
    pub code: Option<String>,
    pub stock_quantity: i64,
    pub category: String,
}

impl From<&Material> for MaterialResponse {
    fn from(material: &Material) -> Self {
        Self {
            id: material.id.to_string(),
            company: material.company.as_str(),
            product_name: material.product_name.clone(),
            brand: material.brand.clone(),
            model: material.model.clone(),
            code: material.code().map(str::to_string),
            stock_quantity: material.stock_quantity,
            category: material.category.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryEntryResponse {
    pub id: String,
    pub kind: &'static str,
    pub quantity_change: i64,
    pub current_balance: i64,
    pub certificate_kind: Option<&'static str>,
    pub certificate_id: Option<String>,
    pub description: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<&MaterialHistoryEntry> for HistoryEntryResponse {
    fn from(entry: &MaterialHistoryEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            kind: entry.kind.as_str(),
            quantity_change: entry.quantity_change,
            current_balance: entry.current_balance,
            certificate_kind: entry.certificate.kind_str(),
            certificate_id: entry.certificate.certificate_id().map(|id| id.to_string()),
            description: entry.description.clone(),
            user_id: entry.user_id.to_string(),
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustodyResponse {
    pub material_id: String,
    pub quantity: i64,
}

impl From<&CustodyBalance> for CustodyResponse {
    fn from(balance: &CustodyBalance) -> Self {
        Self {
            material_id: balance.material_id.to_string(),
            quantity: balance.quantity,
        }
    }
}
