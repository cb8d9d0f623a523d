//! `brigada-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage. Signature
//! verification happens at the transport edge; here live the claims model,
//! deterministic claims validation, and the pure policy checks that gate
//! the certificate workflow.

pub mod authorize;
pub mod claims;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{AuthzError, authorize, can_create_certificates, privilege_for};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use permissions::Permission;
pub use principal::Principal;
pub use roles::Role;
