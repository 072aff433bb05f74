use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity-verification boundary failure.
///
/// Every variant is terminal for the current pass: the resolver treats a
/// transport failure or timeout identically to an explicit rejection.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("identity endpoint rejected the token (status {status})")]
    Rejected { status: u16 },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed response body: {0}")]
    Malformed(String),
}

/// Profile returned by the identity-verification endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    /// Capability hints some endpoints attach. The core ignores these:
    /// permissions are always recomputed from the role table.
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    user: UserProfile,
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<UserProfile>,
    #[serde(default)]
    error: Option<String>,
}

/// Outcome of a credential exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Granted { token: String, profile: UserProfile },
    Refused { message: Option<String> },
}

/// Boundary to the backend identity endpoints.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// `GET /me` with `Authorization: Bearer <token>`. Any non-2xx response
    /// means the token is invalid.
    async fn verify_token(&self, token: &str) -> Result<UserProfile, GatewayError>;

    /// `POST /login` with `{ email, password }`. Credential policy is the
    /// endpoint's responsibility, not this boundary's.
    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, GatewayError>;
}

/// HTTP implementation of [`IdentityGateway`].
#[derive(Debug, Clone)]
pub struct HttpIdentityGateway {
    base_url: String,
    client: reqwest::Client,
}

impl HttpIdentityGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Base URL from `SKILLGRID_API_BASE_URL`, with a dev default.
    pub fn from_env() -> Self {
        let base_url = std::env::var("SKILLGRID_API_BASE_URL").unwrap_or_else(|_| {
            tracing::warn!("SKILLGRID_API_BASE_URL not set; using local dev default");
            "http://127.0.0.1:8080/api/auth".to_string()
        });
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl IdentityGateway for HttpIdentityGateway {
    async fn verify_token(&self, token: &str) -> Result<UserProfile, GatewayError> {
        let response = self
            .client
            .get(format!("{}/me", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
            });
        }

        let body: MeResponse = response
            .json()
            .await
            .map_err(|err| GatewayError::Malformed(err.to_string()))?;
        Ok(body.user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, GatewayError> {
        let response = self
            .client
            .post(format!("{}/login", self.base_url))
            .json(&LoginBody { email, password })
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let status = response.status();
        let body: LoginResponse = match response.json().await {
            Ok(body) => body,
            // A refusal with an unparseable body is still a refusal.
            Err(_) if !status.is_success() => LoginResponse::default(),
            Err(err) => return Err(GatewayError::Malformed(err.to_string())),
        };

        match (status.is_success() && body.success, body.token, body.user) {
            (true, Some(token), Some(profile)) => Ok(LoginOutcome::Granted { token, profile }),
            _ => Ok(LoginOutcome::Refused {
                message: body.error,
            }),
        }
    }
}
