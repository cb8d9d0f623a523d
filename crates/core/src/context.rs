//! Explicit acting context for business operations.
//!
//! Business logic never reads a "current user/company" out of ambient
//! request state; callers pass an `ActingContext` explicitly, which keeps
//! the workflow deterministic under test.

use serde::{Deserialize, Serialize};

use crate::company::Company;
use crate::id::UserId;

/// How much latitude the actor has when targeting a company.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Privilege {
    /// Forced to operate within their own company.
    Standard,
    /// May target any company (administrators, captains, hub staff).
    Elevated,
}

/// Identity and scope of the actor driving one operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActingContext {
    pub user_id: UserId,
    /// The actor's home company.
    pub company: Company,
    pub privilege: Privilege,
}

impl ActingContext {
    pub fn new(user_id: UserId, company: Company, privilege: Privilege) -> Self {
        Self {
            user_id,
            company,
            privilege,
        }
    }

    /// Resolve the company a certificate is created under.
    ///
    /// Elevated actors may pick any company; everyone else is pinned to
    /// their own regardless of the requested value.
    pub fn effective_company(&self, requested: Company) -> Company {
        match self.privilege {
            Privilege::Elevated => requested,
            Privilege::Standard => self.company,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_actor_is_pinned_to_home_company() {
        let ctx = ActingContext::new(UserId::new(), Company::Segunda, Privilege::Standard);
        assert_eq!(ctx.effective_company(Company::Comandancia), Company::Segunda);
    }

    #[test]
    fn elevated_actor_may_target_any_company() {
        let ctx = ActingContext::new(UserId::new(), Company::Segunda, Privilege::Elevated);
        assert_eq!(ctx.effective_company(Company::Quinta), Company::Quinta);
    }
}
