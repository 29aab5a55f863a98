//! Policy engine for evaluating authorization decisions.
//!
//! The policy engine answers the question:
//! "May this profile perform this action?"
//!
//! Rules are applied in a fixed order and the first match wins:
//!
//! 1. No profile: deny.
//! 2. Role `admin`: allow, whatever the overrides say.
//! 3. Explicit override on the profile: its value.
//! 4. The role's default grant set (empty for an unknown role): allow when it
//!    lists the action or holds the wildcard.
//!
//! Evaluation never fails; every miss resolves to a denial.

use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use super::actions::{Action, ActionId};
use super::models::UserProfile;
use super::policy_file::{load_policy_file, PolicySourceError};
use super::roles::{PredefinedRole, RoleDefaults};
use crate::config::PolicyConfig;

/// Role name that short-circuits every check.
pub const SUPER_ADMIN_ROLE: &str = "admin";

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from the policy engine.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Permission denied: {action} ({reason})")]
    PermissionDenied { action: ActionId, reason: DenyReason },
}

// ═══════════════════════════════════════════════════════════════════════════════
// Decision
// ═══════════════════════════════════════════════════════════════════════════════

/// Why an action was allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowReason {
    /// The profile holds the `admin` role.
    SuperAdmin,
    /// The profile carries an explicit `true` override.
    Override,
    /// The role's grant set lists the action.
    RoleDefault,
    /// The role's grant set holds the wildcard.
    Wildcard,
}

/// Why an action was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// No profile was supplied.
    NoSubject,
    /// The profile carries an explicit `false` override.
    Override,
    /// The role exists but does not grant the action.
    NotGranted,
    /// The profile has no role, or a role missing from the table.
    UnknownRole,
}

impl fmt::Display for AllowReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SuperAdmin => "administrator role",
            Self::Override => "explicit user override",
            Self::RoleDefault => "role default grant",
            Self::Wildcard => "role wildcard grant",
        };
        f.write_str(s)
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NoSubject => "no authenticated profile",
            Self::Override => "explicit user override",
            Self::NotGranted => "not granted by role",
            Self::UnknownRole => "unknown or missing role",
        };
        f.write_str(s)
    }
}

/// Result of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum PolicyDecision {
    Allow(AllowReason),
    Deny(DenyReason),
}

impl PolicyDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Deny(_))
    }

    /// `"allow"` or `"deny"`.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Allow(_) => "allow",
            Self::Deny(_) => "deny",
        }
    }
}

impl fmt::Display for PolicyDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow(reason) => write!(f, "allowed: {}", reason),
            Self::Deny(reason) => write!(f, "denied: {}", reason),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Pure Evaluation
// ═══════════════════════════════════════════════════════════════════════════════

/// Decide whether `profile` may perform `action` under `table`, and why.
pub fn decide(profile: Option<&UserProfile>, action: &str, table: &RoleDefaults) -> PolicyDecision {
    let Some(profile) = profile else {
        return PolicyDecision::Deny(DenyReason::NoSubject);
    };

    let role = profile.role_name();
    if role == Some(SUPER_ADMIN_ROLE) {
        return PolicyDecision::Allow(AllowReason::SuperAdmin);
    }

    match profile.override_for(action) {
        Some(true) => return PolicyDecision::Allow(AllowReason::Override),
        Some(false) => return PolicyDecision::Deny(DenyReason::Override),
        None => {}
    }

    let Some(grants) = role.and_then(|r| table.grants_for(r)) else {
        return PolicyDecision::Deny(DenyReason::UnknownRole);
    };

    if grants.contains(action) {
        PolicyDecision::Allow(AllowReason::RoleDefault)
    } else if grants.has_wildcard() {
        PolicyDecision::Allow(AllowReason::Wildcard)
    } else {
        PolicyDecision::Deny(DenyReason::NotGranted)
    }
}

/// Whether `profile` may perform `action` under `table`.
pub fn evaluate(profile: Option<&UserProfile>, action: &str, table: &RoleDefaults) -> bool {
    decide(profile, action, table).is_allowed()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Policy Engine
// ═══════════════════════════════════════════════════════════════════════════════

/// Handle around the current role-defaults table.
///
/// Clones share the same table. Each evaluation reads one snapshot, so a
/// concurrent [`PolicyEngine::replace_table`] is seen either entirely or not
/// at all.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    table: Arc<RwLock<Arc<RoleDefaults>>>,
}

impl PolicyEngine {
    /// Create an engine over the given table.
    pub fn new(table: RoleDefaults) -> Self {
        Self {
            table: Arc::new(RwLock::new(Arc::new(table))),
        }
    }

    /// Create an engine over the compiled-in table.
    pub fn builtin() -> Self {
        Self::new(RoleDefaults::builtin())
    }

    /// Create an engine from the configured policy source.
    pub fn from_config(config: &PolicyConfig) -> Result<Self, PolicySourceError> {
        let table = match &config.path {
            Some(path) => load_policy_file(path, config.strict)?,
            None => RoleDefaults::builtin(),
        };
        Ok(Self::new(table))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Table management
    // ─────────────────────────────────────────────────────────────────────────

    /// The table evaluations currently run against.
    pub fn snapshot(&self) -> Arc<RoleDefaults> {
        self.table.read().clone()
    }

    /// Swap in a whole new table. Returns the previous one.
    pub fn replace_table(&self, table: RoleDefaults) -> Arc<RoleDefaults> {
        let next = Arc::new(table);
        let previous = std::mem::replace(&mut *self.table.write(), next.clone());
        info!(
            from_version = previous.version(),
            to_version = next.version(),
            roles = next.role_count(),
            "Replaced role defaults table"
        );
        previous
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization checks
    // ─────────────────────────────────────────────────────────────────────────

    /// Decide and explain a single check.
    pub fn decide(&self, profile: Option<&UserProfile>, action: &str) -> PolicyDecision {
        decide(profile, action, &self.snapshot())
    }

    /// Whether `profile` may perform `action`.
    pub fn evaluate(&self, profile: Option<&UserProfile>, action: &str) -> bool {
        self.decide(profile, action).is_allowed()
    }

    /// Convenience: returns `Ok(())` if allowed, `Err(PolicyError)` if denied.
    pub fn enforce(&self, profile: Option<&UserProfile>, action: &str) -> Result<(), PolicyError> {
        match self.decide(profile, action) {
            PolicyDecision::Allow(_) => Ok(()),
            PolicyDecision::Deny(reason) => Err(PolicyError::PermissionDenied {
                action: ActionId::new(action),
                reason,
            }),
        }
    }

    /// Allowed only if every action is allowed. An empty list is allowed.
    pub fn check_all(&self, profile: Option<&UserProfile>, actions: &[&str]) -> bool {
        let table = self.snapshot();
        actions.iter().all(|a| evaluate(profile, a, &table))
    }

    /// Allowed if at least one action is allowed. An empty list is denied.
    pub fn check_any(&self, profile: Option<&UserProfile>, actions: &[&str]) -> bool {
        let table = self.snapshot();
        actions.iter().any(|a| evaluate(profile, a, &table))
    }

    /// Catalog actions the profile may perform, in catalog order.
    pub fn effective_actions(&self, profile: Option<&UserProfile>) -> Vec<Action> {
        let table = self.snapshot();
        Action::iter()
            .filter(|a| evaluate(profile, a.as_str(), &table))
            .collect()
    }

    /// Whether `role` is the administrator role or defined in the table.
    pub fn knows_role(&self, role: &str) -> bool {
        role == PredefinedRole::Admin.id() || self.snapshot().contains_role(role)
    }
}

impl Default for PolicyEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
