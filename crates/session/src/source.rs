use skillgrid_core::{DomainError, DomainResult};

/// Identity material supplied by the federated OAuth collaborator.
///
/// The collaborator owns this session's lifecycle; the core only reads it.
/// Presence of a provider email is sufficient for a first-pass identity at
/// minimum privilege.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedSession {
    email: String,
    name: Option<String>,
}

impl FederatedSession {
    /// A provider session must expose at least an email.
    pub fn new(email: impl Into<String>, name: Option<String>) -> DomainResult<Self> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(DomainError::validation(
                "federated session must expose an email",
            ));
        }
        Ok(Self { email, name })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// The session material found in one resolution pass. Created per pass,
/// never persisted itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSource {
    Federated(FederatedSession),
    Token(String),
    Absent,
}

impl SessionSource {
    /// Total precedence function over the two independent sources: a
    /// federated session always wins over a bearer token, so the sources can
    /// never race to produce conflicting identities within one pass.
    pub fn select(federated: Option<FederatedSession>, token: Option<String>) -> SessionSource {
        match (federated, token) {
            (Some(session), _) => SessionSource::Federated(session),
            (None, Some(token)) => SessionSource::Token(token),
            (None, None) => SessionSource::Absent,
        }
    }
}

/// Boundary to the federated OAuth collaborator.
pub trait FederatedSessionProvider: Send + Sync {
    /// The provider's current session, if one exists.
    fn current(&self) -> Option<FederatedSession>;
}

/// Provider for deployments without a federated identity collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFederatedProvider;

impl FederatedSessionProvider for NoFederatedProvider {
    fn current(&self) -> Option<FederatedSession> {
        None
    }
}

/// Provider with a fixed session; used in tests and embedded setups where
/// the provider session is handed in from outside.
#[derive(Debug, Clone, Default)]
pub struct StaticFederatedProvider {
    session: Option<FederatedSession>,
}

impl StaticFederatedProvider {
    pub fn new(session: Option<FederatedSession>) -> Self {
        Self { session }
    }
}

impl FederatedSessionProvider for StaticFederatedProvider {
    fn current(&self) -> Option<FederatedSession> {
        self.session.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn federated() -> FederatedSession {
        FederatedSession::new("tara@provider.example", Some("Tara".to_string())).unwrap()
    }

    #[test]
    fn federated_wins_over_token() {
        let selected = SessionSource::select(Some(federated()), Some("tok".to_string()));
        assert_eq!(selected, SessionSource::Federated(federated()));
    }

    #[test]
    fn token_wins_over_absence() {
        let selected = SessionSource::select(None, Some("tok".to_string()));
        assert_eq!(selected, SessionSource::Token("tok".to_string()));
    }

    #[test]
    fn nothing_selects_absent() {
        assert_eq!(SessionSource::select(None, None), SessionSource::Absent);
    }

    #[test]
    fn provider_session_requires_an_email() {
        assert!(FederatedSession::new("  ", None).is_err());
    }

    #[test]
    fn absent_provider_never_yields_a_session() {
        assert_eq!(NoFederatedProvider.current(), None);
    }
}
