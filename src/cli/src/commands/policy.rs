//! Policy file operations.

use anyhow::{Context, Result};
use clap::Subcommand;
use railgate_core::rbac::{parse_policy, PolicyEngine, RoleDefaults};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum PolicyCommands {
    /// Validate a policy file and summarize it
    Validate {
        /// Path to the TOML policy file
        file: String,
    },

    /// Print the active role table
    Show,
}

#[derive(Tabled, Serialize)]
struct FindingRow {
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Grants")]
    grants: usize,
    #[tabled(rename = "Outside catalog")]
    unknown: String,
}

fn findings(table: &RoleDefaults) -> Vec<FindingRow> {
    table
        .roles()
        .map(|(name, grants)| {
            let unknown: Vec<String> = grants
                .iter()
                .filter(|id| !id.is_wildcard() && id.to_action().is_none())
                .map(|id| id.to_string())
                .collect();
            FindingRow {
                role: name.to_string(),
                grants: grants.len(),
                unknown: unknown.join(", "),
            }
        })
        .collect()
}

/// Parse a policy file and list what each role grants.
pub fn validate(file: &str, strict: bool, format: OutputFormat) -> Result<()> {
    let content =
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file))?;
    let table =
        parse_policy(&content, strict).with_context(|| format!("Invalid policy file {}", file))?;
    output::print_list(&findings(&table), format)
}

/// Print the active role table.
pub fn show(engine: &PolicyEngine, format: OutputFormat) -> Result<()> {
    output::print_item(&*engine.snapshot(), format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_findings_flag_unknown_actions() {
        let content = "[roles]\nuser = [\"bus:read\", \"bus:fly\"]\nall = [\"*\"]\n";
        let table = parse_policy(content, false).unwrap();
        let rows = findings(&table);
        let user = rows.iter().find(|r| r.role == "user").unwrap();
        assert_eq!(user.grants, 2);
        assert_eq!(user.unknown, "bus:fly");
        let all = rows.iter().find(|r| r.role == "all").unwrap();
        assert!(all.unknown.is_empty());
    }
}
