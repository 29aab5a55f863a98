//! Role table inspection.

use anyhow::{bail, Result};
use clap::Subcommand;
use railgate_core::rbac::{ActionId, PolicyEngine, PredefinedRole, SUPER_ADMIN_ROLE};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum RolesCommands {
    /// List roles in the active table
    List,

    /// Show a role's default grant set
    Show {
        /// Role name (e.g. moderator)
        role: String,
    },
}

#[derive(Tabled, Serialize)]
struct RoleRow {
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Grants")]
    grants: usize,
    #[tabled(rename = "Wildcard")]
    wildcard: bool,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled, Serialize)]
struct GrantRow {
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
}

impl From<&ActionId> for GrantRow {
    fn from(id: &ActionId) -> Self {
        let symbol = if id.is_wildcard() {
            "(all actions)".to_string()
        } else {
            id.to_action()
                .map(|a| a.symbol().to_string())
                .unwrap_or_else(|| "(not in catalog)".to_string())
        };
        Self {
            action: id.to_string(),
            symbol,
        }
    }
}

fn describe(role: &str) -> String {
    PredefinedRole::from_id(role)
        .map(|r| r.description().to_string())
        .unwrap_or_default()
}

pub fn execute(cmd: RolesCommands, engine: &PolicyEngine, format: OutputFormat) -> Result<()> {
    let table = engine.snapshot();

    match cmd {
        RolesCommands::List => {
            let rows: Vec<RoleRow> = table
                .roles()
                .map(|(name, grants)| RoleRow {
                    role: name.to_string(),
                    grants: grants.len(),
                    wildcard: grants.has_wildcard(),
                    description: describe(name.as_str()),
                })
                .collect();
            output::print_list(&rows, format)
        }
        RolesCommands::Show { role } => {
            let Some(grants) = table.grants_for(&role) else {
                if role == SUPER_ADMIN_ROLE {
                    output::print_warning("'admin' is not in the table but is always allowed");
                    return output::print_list(&[GrantRow::from(&ActionId::WILDCARD)], format);
                }
                bail!("Unknown role '{}'", role);
            };
            if role == SUPER_ADMIN_ROLE && !grants.has_wildcard() {
                output::print_warning("'admin' is always allowed regardless of its grant set");
            }
            let rows: Vec<GrantRow> = grants.iter().map(GrantRow::from).collect();
            output::print_list(&rows, format)
        }
    }
}
