//! `skillgrid-auth` — pure authorization boundary for the portal core.
//!
//! This crate is intentionally decoupled from HTTP, storage, and UI. It holds
//! the closed role set, the role→permission and route→role tables, the route
//! guard, and the permission deriver. No IO, no panics: every failure mode has
//! a terminal value (empty permission set, `AccessDecision::DenyRole`, …).

pub mod guard;
pub mod identity;
pub mod permissions;
pub mod roles;
pub mod routes;

pub use guard::{AccessDecision, evaluate, has_all_permissions};
pub use identity::{Identity, derive};
pub use permissions::{Permission, RolePermissionTable};
pub use roles::Role;
pub use routes::{RouteAccess, RouteAuthorizationTable};
