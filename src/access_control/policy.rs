//! Access policy evaluator
//!
//! Combines the three principal capability checks with short-circuit AND in
//! the fixed order scope → department → roles. A capability that cannot be
//! answered is a denial of that predicate; nothing propagates to the caller.

use crate::access_control::types::{AccessDecision, DenialReason, Predicate};
use crate::error::PrincipalError;
use crate::model::Item;
use tracing::{debug, trace, warn};

/// What the policy needs to know about the current principal.
///
/// Each query is host-defined; implementations may be backed by a directory
/// service, a profile snapshot or a test fake.
pub trait PrincipalCapabilities: Send + Sync {
    /// The item lies within the principal's span of control
    fn has_scope_over(&self, item: &Item) -> Result<bool, PrincipalError>;

    /// The principal belongs to a department associated with the item
    fn is_in_department(&self, item: &Item) -> Result<bool, PrincipalError>;

    /// The principal holds every role the item requires
    fn has_required_roles(&self, item: &Item) -> Result<bool, PrincipalError>;

    /// Name used in log events
    fn principal_name(&self) -> &str {
        "unknown"
    }
}

/// Three-factor access policy
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy;

impl AccessPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Decide whether `principal` may see `item`
    pub fn is_authorized(
        &self,
        principal: &dyn PrincipalCapabilities,
        item: &Item,
    ) -> AccessDecision {
        for &predicate in Predicate::all() {
            let outcome = match predicate {
                Predicate::Scope => principal.has_scope_over(item),
                Predicate::Department => principal.is_in_department(item),
                Predicate::Roles => principal.has_required_roles(item),
            };

            match outcome {
                Ok(true) => {
                    trace!(predicate = %predicate, item = %item.id, "Predicate satisfied");
                }
                Ok(false) => {
                    debug!(
                        predicate = %predicate,
                        item = %item.id,
                        principal = principal.principal_name(),
                        "Predicate refused"
                    );
                    return AccessDecision::Denied(DenialReason::refused(predicate));
                }
                Err(e) => {
                    warn!(
                        predicate = %predicate,
                        item = %item.id,
                        principal = principal.principal_name(),
                        error = %e,
                        "Predicate could not be evaluated, denying"
                    );
                    return AccessDecision::Denied(DenialReason::lookup_failed(
                        predicate,
                        e.to_string(),
                    ));
                }
            }
        }

        AccessDecision::Granted
    }
}
