//! `skillgrid-session` — identity resolution from independent session sources.
//!
//! Two authentication mechanisms can claim the current actor: a federated
//! OAuth session owned by an external provider, and a bearer token persisted
//! client-side and validated against the backend. This crate merges them into
//! one canonical [`skillgrid_auth::Identity`] (or nothing), with a
//! deterministic precedence order and fail-closed handling of every failure
//! mode. No error escapes [`resolver::SessionResolver::resolve`].

pub mod gateway;
pub mod resolver;
pub mod source;
pub mod store;

pub use gateway::{GatewayError, HttpIdentityGateway, IdentityGateway, LoginOutcome, UserProfile};
pub use resolver::{LoginAttempt, SessionResolver};
pub use source::{
    FederatedSession, FederatedSessionProvider, NoFederatedProvider, SessionSource,
    StaticFederatedProvider,
};
pub use store::{FileTokenStore, InMemoryTokenStore, StoreError, TokenStore};
