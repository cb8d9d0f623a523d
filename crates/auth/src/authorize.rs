//! Pure policy checks gating the certificate endpoints.
//!
//! - No IO
//! - No panics
//! - No business logic

use std::collections::HashSet;

use thiserror::Error;

use brigada_core::Privilege;

use crate::permissions::{self, Permission};
use crate::principal::Principal;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Authorize a principal against one required permission.
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    let perms: HashSet<&str> = principal.permissions.iter().map(|p| p.as_str()).collect();

    if perms.contains("*") || perms.contains(required.as_str()) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

/// Gate for the create-delivery / create-reception endpoints.
///
/// Passes for administrators, captains, hub members, or holders of the
/// explicit module-edit permission.
pub fn can_create_certificates(principal: &Principal) -> Result<(), AuthzError> {
    if principal.has_role(crate::roles::ADMIN)
        || principal.has_role(crate::roles::CAPTAIN)
        || principal.company.is_hub()
    {
        return Ok(());
    }
    authorize(principal, &Permission::new(permissions::CERTIFICATES_CREATE))
}

/// Resolve the company-targeting privilege for a principal.
///
/// Administrators, captains, and hub members may target any company;
/// everyone else is pinned to their own.
pub fn privilege_for(principal: &Principal) -> Privilege {
    if principal.has_role(crate::roles::ADMIN)
        || principal.has_role(crate::roles::CAPTAIN)
        || principal.company.is_hub()
    {
        Privilege::Elevated
    } else {
        Privilege::Standard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brigada_core::{Company, UserId};
    use crate::Role;

    fn principal(company: Company, roles: &[&'static str], perms: &[&'static str]) -> Principal {
        Principal::new(
            UserId::new(),
            company,
            roles.iter().map(|r| Role::new(*r)).collect(),
            perms.iter().map(|p| Permission::new(*p)).collect(),
        )
    }

    #[test]
    fn wildcard_permission_allows_everything() {
        let p = principal(Company::Quinta, &[], &["*"]);
        assert!(authorize(&p, &Permission::new("inventory.certificates.create")).is_ok());
    }

    #[test]
    fn missing_permission_is_forbidden() {
        let p = principal(Company::Quinta, &[], &[]);
        let err = authorize(&p, &Permission::new("inventory.certificates.create")).unwrap_err();
        assert!(matches!(err, AuthzError::Forbidden(_)));
    }

    #[test]
    fn admin_captain_and_hub_can_create_certificates() {
        assert!(can_create_certificates(&principal(Company::Quinta, &["admin"], &[])).is_ok());
        assert!(can_create_certificates(&principal(Company::Quinta, &["captain"], &[])).is_ok());
        assert!(can_create_certificates(&principal(Company::Comandancia, &[], &[])).is_ok());
    }

    #[test]
    fn explicit_module_permission_also_passes() {
        let p = principal(Company::Quinta, &[], &["inventory.certificates.create"]);
        assert!(can_create_certificates(&p).is_ok());
    }

    #[test]
    fn plain_member_gets_standard_privilege() {
        assert_eq!(
            privilege_for(&principal(Company::Quinta, &[], &[])),
            Privilege::Standard
        );
        assert_eq!(
            privilege_for(&principal(Company::Comandancia, &[], &[])),
            Privilege::Elevated
        );
        assert_eq!(
            privilege_for(&principal(Company::Quinta, &["captain"], &[])),
            Privilege::Elevated
        );
    }
}
