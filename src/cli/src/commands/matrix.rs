//! Role x action grid.

use anyhow::Result;
use clap::Args;
use railgate_core::rbac::{evaluate, Action, PolicyEngine, UserProfile, SUPER_ADMIN_ROLE};
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::{builder::Builder, settings::Style};

use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct MatrixArgs {
    /// Roles to include (repeatable); defaults to every role in the table
    #[arg(short, long)]
    role: Vec<String>,

    /// Only include actions on this resource namespace
    #[arg(long)]
    resource: Option<String>,
}

#[derive(Serialize)]
struct MatrixRow {
    action: &'static str,
    roles: BTreeMap<String, bool>,
}

pub fn execute(args: MatrixArgs, engine: &PolicyEngine, format: OutputFormat) -> Result<()> {
    let table = engine.snapshot();

    let roles: Vec<String> = if args.role.is_empty() {
        let mut roles: Vec<String> = table.roles().map(|(name, _)| name.to_string()).collect();
        if !table.contains_role(SUPER_ADMIN_ROLE) {
            roles.insert(0, SUPER_ADMIN_ROLE.to_string());
        }
        roles
    } else {
        args.role
    };

    let profiles: Vec<UserProfile> = roles
        .iter()
        .map(|r| UserProfile::with_role(r.as_str()))
        .collect();

    let rows: Vec<MatrixRow> = Action::iter()
        .filter(|a| args.resource.as_deref().map_or(true, |r| a.resource() == r))
        .map(|action| MatrixRow {
            action: action.as_str(),
            roles: roles
                .iter()
                .zip(&profiles)
                .map(|(role, profile)| {
                    (role.clone(), evaluate(Some(profile), action.as_str(), &table))
                })
                .collect(),
        })
        .collect();

    match format {
        OutputFormat::Table => {
            let mut builder = Builder::default();
            builder.push_record(std::iter::once("Action".to_string()).chain(roles.iter().cloned()));
            for row in &rows {
                builder.push_record(
                    std::iter::once(row.action.to_string())
                        .chain(roles.iter().map(|r| output::verdict(row.roles[r]))),
                );
            }
            println!("{}", builder.build().with(Style::rounded()));
            Ok(())
        }
        _ => output::print_item(&rows, format),
    }
}
