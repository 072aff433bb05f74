use chrono::{DateTime, Utc};

use skillgrid_core::{OrganizationId, UserId};

use crate::permissions::{Permission, RolePermissionTable};
use crate::roles::Role;

/// The resolved representation of the current actor.
///
/// Immutable once constructed: a new resolution pass produces a new
/// `Identity`, it does not patch the old one. The permission set is not part
/// of construction; it is attached exclusively by [`derive`], which keeps
/// the invariant `permissions == table.permissions_for(role)`.
/// Deliberately not deserializable: an identity enters the system through
/// resolution, not through data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub organization_id: Option<OrganizationId>,
    /// Derived from role alone; never set by callers.
    permissions: Vec<Permission>,
    /// Diagnostics only; carries no authorization meaning.
    resolved_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(user_id: UserId, email: String, role: Role, resolved_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            email,
            first_name: String::new(),
            last_name: String::new(),
            role,
            organization_id: None,
            permissions: Vec::new(),
            resolved_at,
        }
    }

    #[must_use]
    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    #[must_use]
    pub fn with_organization(mut self, organization_id: Option<OrganizationId>) -> Self {
        self.organization_id = organization_id;
        self
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub fn resolved_at(&self) -> DateTime<Utc> {
        self.resolved_at
    }

    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// True if the identity's role is any of `roles`.
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    /// Name for display surfaces; falls back to the email when the profile
    /// carries no name.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}

/// Attach the permission set for the identity's role.
///
/// Pure and total: the full set for the role, or the empty set for an
/// unknown role. Whatever was previously attached is discarded and
/// recomputed from the role alone.
pub fn derive(identity: Identity, table: &RolePermissionTable) -> Identity {
    let permissions = table.permissions_for(&identity.role).to_vec();
    Identity {
        permissions,
        ..identity
    }
}
