use crate::{errors::AuthError, use_cases::extractors::Principal};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// No credential was presented.
    DenyAnonymous,
    /// A valid credential without admin rights.
    DenyNotAdmin,
}

/// Authorization check restricting mutating operations to administrators.
///
/// Handlers call [`AdminGate::require_admin`] first thing, before touching
/// any store or file.
pub trait AdminGate: Send + Sync {
    fn decide(&self, principal: &Principal) -> GateDecision;

    fn require_admin(&self, principal: &Principal) -> Result<(), AuthError> {
        match self.decide(principal) {
            GateDecision::Allow => Ok(()),
            GateDecision::DenyAnonymous => Err(AuthError::MissingCredentials),
            GateDecision::DenyNotAdmin => {
                tracing::warn!(subject = principal.subject(), "admin access denied");
                Err(AuthError::Forbidden("Admin access required".into()))
            }
        }
    }
}

/// Trusts the `admin` claim of a token already verified by the auth middleware.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimsAdminGate;

impl AdminGate for ClaimsAdminGate {
    fn decide(&self, principal: &Principal) -> GateDecision {
        match principal.claims() {
            Some(claims) if claims.admin => GateDecision::Allow,
            Some(_) => GateDecision::DenyNotAdmin,
            None => GateDecision::DenyAnonymous,
        }
    }
}
