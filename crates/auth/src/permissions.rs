use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Permission identifier.
///
/// Permissions are modeled as opaque capability strings (e.g.
/// "manage_batches"). They are derived from a role via
/// [`RolePermissionTable`], never granted individually.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static role → granted-permissions mapping.
///
/// The table is exhaustive over [`Role::KNOWN`]; there is deliberately no
/// default/fallback entry, so a missing mapping surfaces as "zero
/// permissions" rather than silently inheriting another role's rights.
/// Built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct RolePermissionTable {
    grants: HashMap<Role, Vec<Permission>>,
}

impl RolePermissionTable {
    /// The portal's built-in grants.
    pub fn builtin() -> Self {
        fn perms(names: &[&'static str]) -> Vec<Permission> {
            names.iter().map(|n| Permission::new(*n)).collect()
        }

        let mut grants = HashMap::new();
        grants.insert(
            Role::PLATFORM_ADMIN,
            perms(&[
                "view_all_data",
                "manage_users",
                "manage_training_partners",
                "manage_batches",
                "manage_placements",
                "manage_payments",
                "view_reports",
                "manage_settings",
                "view_audit_logs",
                "manage_approvals",
                "manage_integrations",
            ]),
        );
        grants.insert(
            Role::TRAINING_PARTNER,
            perms(&[
                "view_own_data",
                "manage_own_batches",
                "manage_own_students",
                "view_own_placements",
                "submit_documents",
                "view_own_payments",
            ]),
        );
        grants.insert(
            Role::STUDENT,
            perms(&[
                "view_own_profile",
                "view_own_batches",
                "view_own_placements",
                "submit_feedback",
            ]),
        );
        grants.insert(
            Role::EMPLOYER,
            perms(&[
                "view_candidates",
                "post_jobs",
                "manage_placements",
                "view_reports",
            ]),
        );
        grants.insert(
            Role::SYSTEM_INTEGRATOR,
            perms(&[
                "view_all_data",
                "view_audit_logs",
                "generate_reports",
                "review_documents",
            ]),
        );

        Self { grants }
    }

    /// Permissions granted to `role`.
    ///
    /// Unknown roles get the empty set (fail closed, not an error).
    pub fn permissions_for(&self, role: &Role) -> &[Permission] {
        self.grants.get(role).map(Vec::as_slice).unwrap_or(&[])
    }
}
