//! Predefined roles and the role-defaults table.
//!
//! Railgate ships with three built-in roles:
//!
//! | Role      | Description                                                          |
//! |-----------|----------------------------------------------------------------------|
//! | Admin     | Everything, including every `delete` action                          |
//! | Moderator | Read and write on every module, manage users; never deletes          |
//! | User      | Per-module mix of read-only and read-write access                     |
//!
//! A profile without a role, or with a role absent from the table, has an
//! empty grant set.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::actions::Action;
use super::models::{GrantSet, RoleName};

// ═══════════════════════════════════════════════════════════════════════════════
// Predefined Roles
// ═══════════════════════════════════════════════════════════════════════════════

/// Built-in role templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredefinedRole {
    Admin,
    Moderator,
    User,
}

impl PredefinedRole {
    /// Role name as stored on profiles.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Moderator => "moderator",
            Self::User => "user",
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Moderator => "Moderator",
            Self::User => "User",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Admin => "Full access to every module, including deletions",
            Self::Moderator => "Read and write on every module and manage users; cannot delete",
            Self::User => "Day-to-day access: read on most tools, write on operational ones",
        }
    }

    /// Default grant set for this role.
    #[rustfmt::skip]
    pub fn grants(&self) -> GrantSet {
        use Action::*;

        match self {
            Self::Admin => GrantSet::wildcard(),
            Self::Moderator => GrantSet::from_actions([
                UsersManage,
                PlanningRead, PlanningWrite,
                JournalRead, JournalWrite,
                DocumentsRead, DocumentsWrite,
                RepertoireRead, RepertoireWrite,
                BusRead, BusWrite,
                TaxiRead, TaxiWrite,
                OttoRead, OttoWrite,
                PtcarRead, PtcarWrite,
                B201Read, B201Write,
                EbpRead, EbpWrite,
                OperationnelRead, OperationnelWrite,
                CartePnRead, CartePnWrite,
                PmrRead, PmrWrite,
                DartsRead, DartsWrite,
            ]),
            // Asymmetric on purpose: repertoire, ptcar, b201, ebp and carte_pn
            // are read-only for users.
            Self::User => GrantSet::from_actions([
                PlanningRead, PlanningWrite,
                JournalRead, JournalWrite,
                DocumentsRead, DocumentsWrite,
                RepertoireRead,
                BusRead, BusWrite,
                TaxiRead, TaxiWrite,
                OttoRead, OttoWrite,
                PtcarRead,
                B201Read,
                EbpRead,
                OperationnelRead, OperationnelWrite,
                CartePnRead,
                PmrRead, PmrWrite,
                DartsRead, DartsWrite,
            ]),
        }
    }

    /// Parse a role name into a predefined role.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().into_iter().find(|r| r.id() == id)
    }

    pub fn all() -> Vec<PredefinedRole> {
        vec![Self::Admin, Self::Moderator, Self::User]
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Role Defaults Table
// ═══════════════════════════════════════════════════════════════════════════════

/// Immutable mapping from role name to default grant set.
///
/// A table is built once and never edited; replacing policy means building a
/// new table with a higher `version` and swapping it into the engine.
#[derive(Debug, Clone, Serialize)]
pub struct RoleDefaults {
    version: u64,
    loaded_at: DateTime<Utc>,
    roles: BTreeMap<RoleName, GrantSet>,
}

impl RoleDefaults {
    /// The compiled-in table built from [`PredefinedRole`].
    pub fn builtin() -> Self {
        PredefinedRole::all()
            .into_iter()
            .fold(Self::builder(), |b, role| b.role(role.id(), role.grants()))
            .build()
    }

    pub fn builder() -> RoleDefaultsBuilder {
        RoleDefaultsBuilder::default()
    }

    /// A table with no roles; every role lookup misses.
    pub fn empty() -> Self {
        Self::builder().build()
    }

    /// Grant set for `role`, or `None` when the role is unknown.
    pub fn grants_for(&self, role: &str) -> Option<&GrantSet> {
        self.roles.get(role)
    }

    pub fn contains_role(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    /// Entries in role-name order.
    pub fn roles(&self) -> impl Iterator<Item = (&RoleName, &GrantSet)> {
        self.roles.iter()
    }

    pub fn role_count(&self) -> usize {
        self.roles.len()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

impl Default for RoleDefaults {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Builder for [`RoleDefaults`].
#[derive(Debug, Default)]
pub struct RoleDefaultsBuilder {
    version: u64,
    roles: BTreeMap<RoleName, GrantSet>,
}

impl RoleDefaultsBuilder {
    /// Set the table version.
    pub fn version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Define (or redefine) a role's grant set.
    pub fn role(mut self, name: impl Into<RoleName>, grants: GrantSet) -> Self {
        self.roles.insert(name.into(), grants);
        self
    }

    pub fn build(self) -> RoleDefaults {
        debug!(
            version = self.version,
            roles = self.roles.len(),
            "Built role defaults table"
        );
        RoleDefaults {
            version: self.version,
            loaded_at: Utc::now(),
            roles: self.roles,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_is_wildcard() {
        let grants = PredefinedRole::Admin.grants();
        assert!(grants.has_wildcard());
        assert_eq!(grants.len(), 1);
    }

    #[test]
    fn test_moderator_never_deletes() {
        let grants = PredefinedRole::Moderator.grants();
        for action in Action::iter() {
            if action.verb() == "delete" {
                assert!(!grants.allows(action.as_str()), "{action}");
            }
        }
        assert!(!grants.allows("users:ban"));
        assert!(!grants.allows("audit:read"));
        assert!(!grants.allows("admin:access"));
        assert!(grants.allows("users:manage"));
    }

    #[test]
    fn test_moderator_reads_and_writes_every_module() {
        let grants = PredefinedRole::Moderator.grants();
        for action in Action::iter().filter(|a| !a.is_administrative()) {
            if action.verb() != "delete" {
                assert!(grants.allows(action.as_str()), "{action}");
            }
        }
    }

    #[test]
    fn test_user_asymmetric_grants() {
        let grants = PredefinedRole::User.grants();
        assert!(grants.allows("repertoire:read"));
        assert!(!grants.allows("repertoire:write"));
        assert!(grants.allows("journal:read"));
        assert!(grants.allows("journal:write"));
        assert!(grants.allows("planning:write"));
        assert!(!grants.allows("ptcar:write"));
        assert!(!grants.allows("carte_pn:write"));
        assert!(!grants.allows("users:manage"));
        assert!(Action::iter()
            .filter(|a| a.verb() == "delete")
            .all(|a| !grants.allows(a.as_str())));
    }

    #[test]
    fn test_builtin_table() {
        let table = RoleDefaults::builtin();
        assert_eq!(table.role_count(), 3);
        assert_eq!(table.version(), 0);
        assert!(table.contains_role("admin"));
        assert!(table.contains_role("moderator"));
        assert!(table.contains_role("user"));
        assert!(table.grants_for("guest").is_none());
    }

    #[test]
    fn test_builder_overrides_role() {
        let table = RoleDefaults::builder()
            .version(7)
            .role("user", GrantSet::wildcard())
            .role("user", GrantSet::from_actions([Action::BusRead]))
            .build();
        assert_eq!(table.version(), 7);
        assert_eq!(table.grants_for("user").map(GrantSet::len), Some(1));
    }

    #[test]
    fn test_predefined_from_id() {
        assert_eq!(PredefinedRole::from_id("moderator"), Some(PredefinedRole::Moderator));
        assert_eq!(PredefinedRole::from_id("guest"), None);
    }
}
