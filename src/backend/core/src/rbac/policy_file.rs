//! Loading a role-defaults table from a TOML policy file.
//!
//! ```toml
//! version = 3
//!
//! [roles]
//! admin = ["*"]
//! moderator = ["users:manage", "planning:read", "planning:write"]
//! user = ["planning:read"]
//! ```
//!
//! The compiled-in table stays the default; a file replaces it wholesale.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::actions::{Action, ActionId};
use super::models::GrantSet;
use super::roles::RoleDefaults;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum PolicySourceError {
    #[error("Failed to read policy file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid policy document: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Role names must not be empty")]
    EmptyRoleName,

    #[error("Role '{role}' grants unknown action '{action}'")]
    UnknownAction { role: String, action: String },
}

// ═══════════════════════════════════════════════════════════════════════════════
// Document
// ═══════════════════════════════════════════════════════════════════════════════

/// On-disk shape of a policy file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PolicyDocument {
    #[serde(default)]
    version: u64,
    #[serde(default)]
    roles: BTreeMap<String, Vec<String>>,
}

/// Parse a policy document.
///
/// Grants naming neither a catalog action nor the wildcard are logged and
/// kept, or rejected when `strict` is set.
pub fn parse_policy(content: &str, strict: bool) -> Result<RoleDefaults, PolicySourceError> {
    let doc: PolicyDocument = toml::from_str(content)?;
    let mut builder = RoleDefaults::builder().version(doc.version);

    for (role, actions) in doc.roles {
        if role.trim().is_empty() {
            return Err(PolicySourceError::EmptyRoleName);
        }

        let mut grants = GrantSet::new();
        for action in actions {
            let id = ActionId::new(action);
            if !id.is_wildcard() && Action::from_wire(id.as_str()).is_none() {
                if strict {
                    return Err(PolicySourceError::UnknownAction {
                        role,
                        action: id.to_string(),
                    });
                }
                warn!(role = %role, action = %id, "Policy grants an action outside the catalog");
            }
            grants.insert(id);
        }
        builder = builder.role(role, grants);
    }

    Ok(builder.build())
}

/// Read and parse a policy file.
pub fn load_policy_file(
    path: impl AsRef<Path>,
    strict: bool,
) -> Result<RoleDefaults, PolicySourceError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| PolicySourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let table = parse_policy(&content, strict)?;
    info!(
        path = %path.display(),
        version = table.version(),
        roles = table.role_count(),
        "Loaded policy file"
    );
    Ok(table)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
