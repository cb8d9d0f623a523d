//! API-side principal resolution and the acting context it yields.
//!
//! Verified claims become a `Principal` here (roles plus the permissions
//! they imply), and a `Principal` becomes the explicit `ActingContext`
//! handed to the certificate workflow. Policy checks themselves live in
//! `brigada-auth`; this module only feeds them.

use brigada_auth::{privilege_for, JwtClaims, Permission, Principal, Role};
use brigada_core::ActingContext;

/// Resolve a principal from verified claims.
pub fn principal_from_claims(claims: &JwtClaims) -> Principal {
    Principal::new(
        claims.sub,
        claims.company,
        claims.roles.clone(),
        permissions_from_roles(&claims.roles),
    )
}

/// The acting context the workflow receives for this principal.
pub fn acting_context(principal: &Principal) -> ActingContext {
    ActingContext::new(
        principal.user_id,
        principal.company,
        privilege_for(principal),
    )
}

/// Minimal role→permission mapping.
///
/// Convention: "admin" grants every permission. Everyone else relies on
/// role- and company-based gates until a real policy source exists.
fn permissions_from_roles(roles: &[Role]) -> Vec<Permission> {
    if roles.iter().any(|r| r.as_str() == brigada_auth::roles::ADMIN) {
        return vec![Permission::new("*")];
    }

    Vec::new()
}
