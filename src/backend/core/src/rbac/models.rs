//! RBAC data models: role names, user profiles, and grant sets.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::actions::{Action, ActionId};

// ═══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ═══════════════════════════════════════════════════════════════════════════════

/// Strongly-typed role name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(pub String);

impl RoleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RoleName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RoleName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::borrow::Borrow<str> for RoleName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// User Profile
// ═══════════════════════════════════════════════════════════════════════════════

/// The subject of an authorization check.
///
/// Profiles are built by the identity/session layer, usually straight from the
/// profile store's JSON (`{"role": "user", "permissions": {"bus:delete": true}}`).
/// Both fields may be missing or `null`. The engine only reads a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Role name; `None` for a profile without a role.
    #[serde(default)]
    pub role: Option<RoleName>,

    /// Per-user overrides, keyed by action identifier. Keys are not checked
    /// against the catalog. Entries whose value is not a boolean are dropped
    /// on load and so never override the role defaults.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "boolean_overrides"
    )]
    pub permissions: Option<HashMap<String, bool>>,
}

fn boolean_overrides<'de, D>(deserializer: D) -> Result<Option<HashMap<String, bool>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|entries| {
        entries
            .into_iter()
            .filter_map(|(action, value)| value.as_bool().map(|allowed| (action, allowed)))
            .collect()
    }))
}

impl UserProfile {
    /// A profile with no role and no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// A profile with the given role and no overrides.
    pub fn with_role(role: impl Into<RoleName>) -> Self {
        Self {
            role: Some(role.into()),
            permissions: None,
        }
    }

    /// Add an explicit grant override.
    pub fn allow(self, action: impl Into<ActionId>) -> Self {
        self.with_override(action, true)
    }

    /// Add an explicit revoke override.
    pub fn deny(self, action: impl Into<ActionId>) -> Self {
        self.with_override(action, false)
    }

    /// Add an override with an explicit value.
    pub fn with_override(mut self, action: impl Into<ActionId>, allowed: bool) -> Self {
        self.permissions
            .get_or_insert_with(HashMap::new)
            .insert(action.into().as_str().to_string(), allowed);
        self
    }

    /// Role name as a string slice.
    pub fn role_name(&self) -> Option<&str> {
        self.role.as_ref().map(RoleName::as_str)
    }

    /// Explicit override for `action`, if one is recorded.
    pub fn override_for(&self, action: &str) -> Option<bool> {
        self.permissions.as_ref()?.get(action).copied()
    }

    /// Number of override entries (zero when the map is absent).
    pub fn override_count(&self) -> usize {
        self.permissions.as_ref().map_or(0, HashMap::len)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Grant Set
// ═══════════════════════════════════════════════════════════════════════════════

/// The actions a role permits by default.
///
/// May contain [`ActionId::WILDCARD`], in which case every action is allowed.
/// Order is irrelevant; a `BTreeSet` keeps listings stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantSet(BTreeSet<ActionId>);

impl GrantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The grant set containing only the wildcard.
    pub fn wildcard() -> Self {
        Self(BTreeSet::from([ActionId::WILDCARD]))
    }

    /// Build from catalog actions.
    pub fn from_actions(actions: impl IntoIterator<Item = Action>) -> Self {
        actions.into_iter().map(ActionId::from).collect()
    }

    /// Add an identifier to the set.
    pub fn insert(&mut self, id: impl Into<ActionId>) -> bool {
        self.0.insert(id.into())
    }

    /// Whether the set lists `action` verbatim.
    pub fn contains(&self, action: &str) -> bool {
        self.0.contains(action)
    }

    /// Whether the set holds the wildcard sentinel.
    pub fn has_wildcard(&self) -> bool {
        self.0.contains("*")
    }

    /// Whether the set permits `action`: listed verbatim, or wildcard present.
    pub fn allows(&self, action: &str) -> bool {
        self.contains(action) || self.has_wildcard()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ActionId> for GrantSet {
    fn from_iter<I: IntoIterator<Item = ActionId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a GrantSet {
    type Item = &'a ActionId;
    type IntoIter = std::collections::btree_set::Iter<'a, ActionId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
