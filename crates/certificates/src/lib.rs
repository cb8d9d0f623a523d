//! `brigada-certificates` — immutable movement documents.
//!
//! A certificate records one delivery or one reception: which company,
//! which firefighter, which materials and quantities. Certificates are
//! created once by the workflow and never mutated afterwards, like the
//! ledger rows they give rise to.

pub mod certificate;
pub mod request;

pub use certificate::{AssignmentMode, Certificate, CertificateLine, DocumentKind};
pub use request::{CreateCertificateRequest, RequestedLine};
