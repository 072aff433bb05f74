use crate::identity::Identity;
use crate::permissions::Permission;
use crate::roles::Role;
use crate::routes::{RouteAccess, RouteAuthorizationTable};

/// Result of an authorization check.
///
/// Produced fresh per `(identity, path)` pair, never cached across
/// navigations, because role and permissions can change between checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    /// The path is restricted to `required` roles and the actor holds none.
    DenyRole { required: Vec<Role> },
    /// The feature requires `required` permissions the actor is missing.
    DenyPermission { required: Vec<Permission> },
}

impl AccessDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// Route-level check: may `role` reach `path`?
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn evaluate(role: &Role, path: &str, routes: &RouteAuthorizationTable) -> AccessDecision {
    match routes.roles_for(path) {
        RouteAccess::Unrestricted => AccessDecision::Allow,
        RouteAccess::Restricted(allowed) => {
            if allowed.contains(role) {
                AccessDecision::Allow
            } else {
                AccessDecision::DenyRole {
                    required: allowed.to_vec(),
                }
            }
        }
    }
}

/// Feature-level check: does the identity hold *every* required permission?
///
/// An AND over the required set; an empty required set trivially allows.
pub fn has_all_permissions(identity: &Identity, required: &[Permission]) -> AccessDecision {
    if required.iter().all(|p| identity.has_permission(p)) {
        AccessDecision::Allow
    } else {
        AccessDecision::DenyPermission {
            required: required.to_vec(),
        }
    }
}
