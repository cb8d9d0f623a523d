//! `brigada-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod company;
pub mod context;
pub mod error;
pub mod id;

pub use company::Company;
pub use context::{ActingContext, Privilege};
pub use error::{DomainError, DomainResult};
pub use id::{CertificateId, FirefighterId, MaterialId, UserId};
