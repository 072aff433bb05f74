use skillgrid_auth::guard::{self, AccessDecision};
use skillgrid_auth::{Identity, Permission, Role, RolePermissionTable, RouteAuthorizationTable, derive};
use skillgrid_session::{LoginAttempt, SessionResolver};

use crate::state::{AccessRequirements, AccessState, DenialPolicy, DenialReason, Effect};

/// Result of a login as seen by the UI: a flag plus an optional message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginStatus {
    pub success: bool,
    pub message: Option<String>,
}

/// One in-flight resolution, stamped with the controller generation that
/// started it. Running the pass borrows nothing from the controller, so the
/// view can be navigated away (or unmounted) while the pass is in flight.
pub struct ResolutionPass {
    generation: u64,
    resolver: SessionResolver,
}

impl ResolutionPass {
    pub async fn run(self) -> ResolutionOutcome {
        ResolutionOutcome {
            generation: self.generation,
            identity: self.resolver.resolve().await,
        }
    }
}

/// What a resolution pass produced. Applied via
/// [`AccessController::settle`], which discards it if it is stale.
pub struct ResolutionOutcome {
    generation: u64,
    identity: Option<Identity>,
}

/// Orchestrates session resolution, permission derivation, and the route
/// guard for protected views.
///
/// Owns the current identity for the lifetime of the authenticated UI
/// session and is its single writer; everything else reads through the query
/// surface. Tables are built once at construction and never mutated.
pub struct AccessController {
    resolver: SessionResolver,
    permissions: RolePermissionTable,
    routes: RouteAuthorizationTable,
    policy: DenialPolicy,
    identity: Option<Identity>,
    state: AccessState,
    generation: u64,
}

impl AccessController {
    pub fn new(resolver: SessionResolver) -> Self {
        Self {
            resolver,
            permissions: RolePermissionTable::builtin(),
            routes: RouteAuthorizationTable::builtin(),
            policy: DenialPolicy::default(),
            identity: None,
            state: AccessState::Loading,
            generation: 0,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: DenialPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_tables(
        mut self,
        permissions: RolePermissionTable,
        routes: RouteAuthorizationTable,
    ) -> Self {
        self.permissions = permissions;
        self.routes = routes;
        self
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Begin a resolution pass for a freshly mounted view. Moves to
    /// `Loading` and invalidates anything still in flight.
    pub fn start_pass(&mut self) -> ResolutionPass {
        self.generation += 1;
        self.state = AccessState::Loading;
        ResolutionPass {
            generation: self.generation,
            resolver: self.resolver.clone(),
        }
    }

    /// The consuming view unmounted: whatever is still in flight must not
    /// apply.
    pub fn invalidate_pending(&mut self) {
        self.generation += 1;
    }

    /// Apply a settled resolution and evaluate the three checks for `path`.
    ///
    /// A stale outcome (superseded by a newer pass, navigation, login, or
    /// logout) is discarded without touching any state. The returned effect,
    /// if any, is performed by the caller after this returns, never during
    /// evaluation.
    pub fn settle(
        &mut self,
        outcome: ResolutionOutcome,
        requirements: &AccessRequirements,
        path: &str,
    ) -> Option<Effect> {
        if outcome.generation != self.generation {
            tracing::debug!("discarding stale resolution pass");
            return None;
        }

        match outcome.identity {
            None => {
                self.identity = None;
                self.state = AccessState::Unauthenticated;
                Some(Effect::RedirectToLogin)
            }
            Some(identity) => {
                self.identity = Some(derive(identity, &self.permissions));
                self.evaluate(requirements, path)
            }
        }
    }

    /// Resolve and settle in one step, for straight-line callers.
    pub async fn mount(
        &mut self,
        requirements: &AccessRequirements,
        path: &str,
    ) -> Option<Effect> {
        let pass = self.start_pass();
        let outcome = pass.run().await;
        self.settle(outcome, requirements, path)
    }

    /// The path (or its requirements) changed: re-run the checks against the
    /// already-resolved identity. Anything still in flight was started for
    /// the old view and is invalidated.
    pub fn navigate(&mut self, requirements: &AccessRequirements, path: &str) -> Option<Effect> {
        self.generation += 1;
        self.evaluate(requirements, path)
    }

    /// Exchange credentials for an identity. On success the permission set
    /// is recomputed from the role table; whatever capability list the
    /// endpoint sent along is ignored. The controller stays in `Loading`
    /// until the caller navigates to a view.
    pub async fn login(&mut self, email: &str, password: &str) -> LoginStatus {
        self.generation += 1;
        self.state = AccessState::Loading;

        match self.resolver.login(email, password).await {
            LoginAttempt::Granted(identity) => {
                self.identity = Some(derive(identity, &self.permissions));
                LoginStatus {
                    success: true,
                    message: None,
                }
            }
            LoginAttempt::Refused { message } => {
                self.identity = None;
                self.state = AccessState::Unauthenticated;
                LoginStatus {
                    success: false,
                    message,
                }
            }
        }
    }

    /// Drop the identity, clear the persisted token, and send the actor to
    /// the login entry point.
    pub fn logout(&mut self) -> Effect {
        self.generation += 1;
        self.identity = None;
        self.resolver.clear_persisted_token();
        self.state = AccessState::Unauthenticated;
        Effect::RedirectToLogin
    }

    // ─────────────────────────────────────────────────────────────────────
    // Read-only query surface
    // ─────────────────────────────────────────────────────────────────────

    pub fn state(&self) -> &AccessState {
        &self.state
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.identity
            .as_ref()
            .is_some_and(|identity| identity.has_permission(permission))
    }

    /// True if the current identity's role is any of `roles`.
    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.identity
            .as_ref()
            .is_some_and(|identity| identity.has_any_role(roles))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Evaluation
    // ─────────────────────────────────────────────────────────────────────

    /// The three independent checks, in order; the first denial wins and its
    /// reason is retained for the denial view.
    fn evaluate(&mut self, requirements: &AccessRequirements, path: &str) -> Option<Effect> {
        let Some(identity) = self.identity.as_ref() else {
            self.state = AccessState::Unauthenticated;
            return Some(Effect::RedirectToLogin);
        };

        let next = if !requirements.required_roles.is_empty()
            && !identity.has_any_role(&requirements.required_roles)
        {
            AccessState::Denied(DenialReason::MissingRole {
                required: requirements.required_roles.clone(),
                actual: identity.role.clone(),
            })
        } else if let AccessDecision::DenyPermission { required } =
            guard::has_all_permissions(identity, &requirements.required_permissions)
        {
            AccessState::Denied(DenialReason::MissingPermission { required })
        } else if let AccessDecision::DenyRole { required } =
            guard::evaluate(&identity.role, path, &self.routes)
        {
            AccessState::Denied(DenialReason::RouteDenied {
                path: path.to_string(),
                required,
                actual: identity.role.clone(),
            })
        } else {
            AccessState::Authorized
        };

        // Only the route-level denial is policy-driven; the actor is
        // authenticated, so list denials stay on the page.
        let effect = match (&next, self.policy) {
            (AccessState::Denied(DenialReason::RouteDenied { .. }), DenialPolicy::RedirectToLogin) => {
                Some(Effect::RedirectToLogin)
            }
            _ => None,
        };

        self.state = next;
        effect
    }
}
