use brigada_auth::Principal;

/// Authenticated principal attached to a request.
///
/// Present on every route behind the auth middleware; handlers read it via
/// `Extension`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}
