//! `skillgrid-access` — the access controller for protected views.
//!
//! Drives the loading → resolved → allowed/denied lifecycle: orchestrates the
//! session resolver, the permission deriver, and the route guard, and owns
//! the single writable identity slot. Consumers only ever see the read-only
//! query surface (`identity`, `is_loading`, `is_authenticated`,
//! `has_permission`, `has_role`) and the settled [`state::AccessState`],
//! never the underlying tables.

pub mod controller;
pub mod state;

pub use controller::{AccessController, LoginStatus, ResolutionOutcome, ResolutionPass};
pub use state::{AccessRequirements, AccessState, DenialPolicy, DenialReason, Effect};
