use std::sync::Arc;

use chrono::Utc;

use skillgrid_auth::{Identity, Role};
use skillgrid_core::{DomainResult, UserId};

use crate::gateway::{IdentityGateway, LoginOutcome, UserProfile};
use crate::source::{FederatedSession, FederatedSessionProvider, SessionSource};
use crate::store::TokenStore;

/// Outcome of a credential login as seen by callers: a boolean-style result
/// with an optional message, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAttempt {
    Granted(Identity),
    Refused { message: Option<String> },
}

impl LoginAttempt {
    pub fn is_granted(&self) -> bool {
        matches!(self, LoginAttempt::Granted(_))
    }
}

/// Merges the two possible identity sources into a canonical identity.
///
/// Stateless: every call re-reads the collaborators, so it is idempotent and
/// safe to call on every relevant UI transition. Identities come back with an
/// empty permission set; attaching permissions is the deriver's job.
#[derive(Clone)]
pub struct SessionResolver {
    provider: Arc<dyn FederatedSessionProvider>,
    store: Arc<dyn TokenStore>,
    gateway: Arc<dyn IdentityGateway>,
}

impl SessionResolver {
    pub fn new(
        provider: Arc<dyn FederatedSessionProvider>,
        store: Arc<dyn TokenStore>,
        gateway: Arc<dyn IdentityGateway>,
    ) -> Self {
        Self {
            provider,
            store,
            gateway,
        }
    }

    /// Resolve the current actor, or nothing.
    ///
    /// Priority: federated session first (no backend call), then persisted
    /// bearer token validated against `/me`. Every failure mode lands on
    /// `None`; a token that fails validation is evicted from the store so it
    /// is never retained.
    pub async fn resolve(&self) -> Option<Identity> {
        let token = match self.store.load() {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %err, "token store unreadable; treating token as absent");
                None
            }
        };

        match SessionSource::select(self.provider.current(), token) {
            SessionSource::Federated(session) => federated_identity(session),
            SessionSource::Token(token) => self.verify_and_build(&token).await,
            SessionSource::Absent => None,
        }
    }

    /// Exchange credentials for a persisted token and a first identity.
    ///
    /// On success the token is written to the store; on any failure nothing
    /// is written and the refusal (with the endpoint's message, if any) is
    /// returned. Never panics, never propagates an error.
    pub async fn login(&self, email: &str, password: &str) -> LoginAttempt {
        if email.trim().is_empty() || password.is_empty() {
            return LoginAttempt::Refused {
                message: Some("email and password are required".to_string()),
            };
        }

        match self.gateway.login(email, password).await {
            Ok(LoginOutcome::Granted { token, profile }) => match identity_from_profile(profile) {
                Ok(identity) => {
                    if let Err(err) = self.store.save(&token) {
                        tracing::warn!(error = %err, "failed to persist session token");
                    }
                    LoginAttempt::Granted(identity)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "login response carried an unusable profile");
                    LoginAttempt::Refused { message: None }
                }
            },
            Ok(LoginOutcome::Refused { message }) => LoginAttempt::Refused { message },
            Err(err) => {
                tracing::warn!(error = %err, "login call failed");
                LoginAttempt::Refused { message: None }
            }
        }
    }

    /// Remove the persisted token (logout path).
    pub fn clear_persisted_token(&self) {
        if let Err(err) = self.store.clear() {
            tracing::warn!(error = %err, "failed to clear persisted token");
        }
    }

    async fn verify_and_build(&self, token: &str) -> Option<Identity> {
        match self.gateway.verify_token(token).await {
            Ok(profile) => match identity_from_profile(profile) {
                Ok(identity) => Some(identity),
                Err(err) => {
                    tracing::warn!(error = %err, "identity endpoint returned an unusable profile");
                    self.evict_token();
                    None
                }
            },
            Err(err) => {
                tracing::debug!(error = %err, "token verification failed; evicting token");
                self.evict_token();
                None
            }
        }
    }

    fn evict_token(&self) {
        if let Err(err) = self.store.clear() {
            tracing::warn!(error = %err, "failed to evict invalid token");
        }
    }
}

/// First-pass identity from a federated session: least-privileged role, no
/// backend consultation. The provider email doubles as the stable id.
fn federated_identity(session: FederatedSession) -> Option<Identity> {
    let user_id: UserId = session.email().parse().ok()?;
    let name = session.name().unwrap_or_default().to_string();
    Some(
        Identity::new(
            user_id,
            session.email().to_string(),
            Role::STUDENT,
            Utc::now(),
        )
        .with_name(name, ""),
    )
}

fn identity_from_profile(profile: UserProfile) -> DomainResult<Identity> {
    let user_id: UserId = profile.id.parse()?;
    let organization_id = profile
        .organization_id
        .as_deref()
        .map(str::parse)
        .transpose()?;

    Ok(Identity::new(
        user_id,
        profile.email,
        Role::new(profile.role),
        Utc::now(),
    )
    .with_name(profile.first_name, profile.last_name)
    .with_organization(organization_id))
}
