use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used for RBAC.
///
/// Roles are opaque strings at the type level so that drifted data (a role
/// string the portal does not know) can still flow through the system; such
/// roles fail closed everywhere: zero permissions, member of no route's
/// allowed set. The closed set the portal grants rights to is exposed as
/// associated constants and [`Role::KNOWN`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// Portal-wide administrator.
    pub const PLATFORM_ADMIN: Role = Role(Cow::Borrowed("platform_admin"));
    /// Training-partner organization staff.
    pub const TRAINING_PARTNER: Role = Role(Cow::Borrowed("training_partner"));
    /// Enrolled student/trainee. Least-privileged; the default for
    /// federated first-pass identities.
    pub const STUDENT: Role = Role(Cow::Borrowed("student"));
    /// Hiring employer.
    pub const EMPLOYER: Role = Role(Cow::Borrowed("employer"));
    /// System integrator / auditor.
    pub const SYSTEM_INTEGRATOR: Role = Role(Cow::Borrowed("system_integrator"));

    /// The closed set of roles the portal defines.
    pub const KNOWN: [Role; 5] = [
        Role::PLATFORM_ADMIN,
        Role::TRAINING_PARTNER,
        Role::STUDENT,
        Role::EMPLOYER,
        Role::SYSTEM_INTEGRATOR,
    ];

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this role belongs to the closed set.
    pub fn is_known(&self) -> bool {
        Role::KNOWN.iter().any(|r| r == self)
    }

    /// Human-readable role name for display surfaces.
    ///
    /// Unknown roles display as their raw string.
    pub fn display_name(&self) -> &str {
        match self.as_str() {
            "platform_admin" => "Platform Administrator",
            "training_partner" => "Training Partner",
            "student" => "Student/Trainee",
            "employer" => "Employer",
            "system_integrator" => "System Integrator/Auditor",
            other => other,
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
