//! Catalog listing.

use anyhow::{bail, Result};
use clap::Args;
use railgate_core::rbac::{Action, MODULE_RESOURCES};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct ActionsArgs {
    /// Only list actions on this resource namespace (e.g. planning)
    #[arg(short, long)]
    resource: Option<String>,

    /// Only list administration actions
    #[arg(long, conflicts_with = "resource")]
    admin_only: bool,
}

#[derive(Tabled, Serialize)]
struct ActionRow {
    #[tabled(rename = "Symbol")]
    symbol: &'static str,
    #[tabled(rename = "Action")]
    id: &'static str,
    #[tabled(rename = "Resource")]
    resource: &'static str,
    #[tabled(rename = "Verb")]
    verb: &'static str,
}

impl From<Action> for ActionRow {
    fn from(action: Action) -> Self {
        Self {
            symbol: action.symbol(),
            id: action.as_str(),
            resource: action.resource(),
            verb: action.verb(),
        }
    }
}

pub fn execute(args: ActionsArgs, format: OutputFormat) -> Result<()> {
    let rows: Vec<ActionRow> = match &args.resource {
        Some(resource) => {
            let rows: Vec<ActionRow> =
                Action::for_resource(resource).map(ActionRow::from).collect();
            if rows.is_empty() {
                bail!(
                    "Unknown resource '{}'. Module resources: {}",
                    resource,
                    MODULE_RESOURCES.join(", ")
                );
            }
            rows
        }
        None => Action::iter()
            .filter(|a| !args.admin_only || a.is_administrative())
            .map(ActionRow::from)
            .collect(),
    };

    output::print_list(&rows, format)
}
