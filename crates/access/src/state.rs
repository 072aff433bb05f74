use skillgrid_auth::{Permission, Role};

/// Lifecycle of a protected view.
///
/// `Loading` gates rendering until resolution settles; `Authorized` and
/// `Denied` are terminal for a given view. `Authorized` is never cached
/// across an identity, role, or path change; the controller re-runs the
/// full transition logic on each of those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessState {
    /// Resolution has not settled; render nothing protected yet.
    Loading,
    /// No identity could be resolved.
    Unauthenticated,
    /// All checks passed; render the protected view.
    Authorized,
    /// Authenticated but not authorized, with the most specific reason.
    Denied(DenialReason),
}

impl AccessState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AccessState::Loading)
    }

    pub fn is_authorized(&self) -> bool {
        matches!(self, AccessState::Authorized)
    }
}

/// Why an authenticated actor was denied, in check order: the first failing
/// check wins and is the reason shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    /// The caller's explicit required-role list does not contain the
    /// actor's role.
    MissingRole { required: Vec<Role>, actual: Role },
    /// The caller's explicit required-permission list is not fully
    /// satisfied.
    MissingPermission { required: Vec<Permission> },
    /// The route authorization table restricts the path to other roles.
    RouteDenied {
        path: String,
        required: Vec<Role>,
        actual: Role,
    },
}

/// Side effect to perform after a transition settles.
///
/// Effects are returned from settle/navigate calls, never performed during
/// evaluation, so repeated re-evaluation cannot produce redirect loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    RedirectToLogin,
}

/// How route-guard denials are presented. Role- and permission-list denials
/// are always inline (the actor is authenticated; this is an authorization
/// failure); only the route-level denial is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DenialPolicy {
    /// Show an in-page denial naming the missing roles.
    Inline,
    /// Redirect to the login entry point.
    #[default]
    RedirectToLogin,
}

/// Caller-declared requirements for a protected view, on top of the route
/// table. Empty lists impose nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRequirements {
    pub required_roles: Vec<Role>,
    pub required_permissions: Vec<Permission>,
}

impl AccessRequirements {
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.required_roles = roles.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.required_permissions = permissions.into_iter().collect();
        self
    }
}
