use std::collections::HashMap;

use crate::roles::Role;

/// Result of a route authorization lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess<'a> {
    /// No entry restricts this path; every role may reach it.
    Unrestricted,
    /// Only the listed roles may reach this path.
    Restricted(&'a [Role]),
}

/// Static path-prefix → allowed-roles mapping.
///
/// Entries are keyed by exact path strings (`/tps`, `/payments`, …). Most
/// application paths are sub-resources of a top-level section, so lookup
/// falls back to the longest matching prefix: `/tps/42/documents` inherits
/// `/tps`. A path matching no entry at all is unrestricted: new sections
/// ship reachable-by-default and are locked down by adding an entry. That
/// fallback is not a security boundary on its own; sensitive actions pair it
/// with a permission check, and the branch is logged so gaps stay visible.
#[derive(Debug, Clone)]
pub struct RouteAuthorizationTable {
    entries: HashMap<String, Vec<Role>>,
}

impl RouteAuthorizationTable {
    /// The portal's built-in route restrictions.
    pub fn builtin() -> Self {
        let all = Role::KNOWN.to_vec();
        Self::from_entries([
            ("/", all),
            ("/tps", vec![Role::PLATFORM_ADMIN, Role::SYSTEM_INTEGRATOR]),
            (
                "/batches",
                vec![
                    Role::PLATFORM_ADMIN,
                    Role::TRAINING_PARTNER,
                    Role::SYSTEM_INTEGRATOR,
                ],
            ),
            (
                "/placements",
                vec![
                    Role::PLATFORM_ADMIN,
                    Role::TRAINING_PARTNER,
                    Role::EMPLOYER,
                    Role::SYSTEM_INTEGRATOR,
                ],
            ),
            (
                "/approvals",
                vec![Role::PLATFORM_ADMIN, Role::SYSTEM_INTEGRATOR],
            ),
            (
                "/payments",
                vec![Role::PLATFORM_ADMIN, Role::TRAINING_PARTNER],
            ),
            (
                "/reports",
                vec![
                    Role::PLATFORM_ADMIN,
                    Role::SYSTEM_INTEGRATOR,
                    Role::EMPLOYER,
                ],
            ),
            (
                "/audit-logs",
                vec![Role::PLATFORM_ADMIN, Role::SYSTEM_INTEGRATOR],
            ),
            ("/settings", vec![Role::PLATFORM_ADMIN]),
            ("/integrations", vec![Role::PLATFORM_ADMIN]),
            (
                "/files",
                vec![
                    Role::PLATFORM_ADMIN,
                    Role::TRAINING_PARTNER,
                    Role::SYSTEM_INTEGRATOR,
                ],
            ),
        ])
    }

    /// Build a table from explicit entries (tests, future policy sources).
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<Role>)>,
        K: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(path, roles)| (path.into(), roles))
                .collect(),
        }
    }

    /// Roles allowed to reach `path`.
    ///
    /// Exact match first; otherwise the longest prefix obtained by dropping
    /// one trailing segment at a time; otherwise unrestricted.
    pub fn roles_for(&self, path: &str) -> RouteAccess<'_> {
        if let Some(roles) = self.entries.get(path) {
            return RouteAccess::Restricted(roles);
        }

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        for end in (1..=segments.len()).rev() {
            let prefix = format!("/{}", segments[..end].join("/"));
            if let Some(roles) = self.entries.get(prefix.as_str()) {
                return RouteAccess::Restricted(roles);
            }
        }

        tracing::warn!(path, "no route authorization entry matched; unrestricted");
        RouteAccess::Unrestricted
    }
}
