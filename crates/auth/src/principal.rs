use serde::{Deserialize, Serialize};

use brigada_core::{Company, UserId};

use crate::{Permission, Role};

/// A fully resolved principal for authorization decisions.
///
/// Construction is intentionally decoupled from storage and transport: the
/// API derives principals from verified claims and a policy source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    /// The principal's home company.
    pub company: Company,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
}

impl Principal {
    pub fn new(
        user_id: UserId,
        company: Company,
        roles: Vec<Role>,
        permissions: Vec<Permission>,
    ) -> Self {
        Self {
            user_id,
            company,
            roles,
            permissions,
        }
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.as_str() == name)
    }
}
