//! Explain a single permission decision.

use anyhow::{Context, Result};
use clap::Args;
use railgate_core::rbac::{Action, PolicyDecision, PolicyEngine, RoleName, UserProfile};
use railgate_core::RailgateError;
use serde::Serialize;
use std::path::PathBuf;

use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct CheckArgs {
    /// Action identifier (e.g. planning:write) or symbol (e.g. PLANNING_WRITE)
    action: String,

    /// Role of the profile
    #[arg(short, long)]
    role: Option<String>,

    /// Explicit grant override (repeatable)
    #[arg(long, value_name = "ACTION")]
    allow: Vec<String>,

    /// Explicit revoke override (repeatable)
    #[arg(long, value_name = "ACTION")]
    deny: Vec<String>,

    /// Profile JSON as stored by the user-profile store
    #[arg(long, value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Check with no profile at all
    #[arg(long, conflicts_with_all = ["role", "allow", "deny", "profile"])]
    anonymous: bool,
}

#[derive(Serialize)]
struct CheckReport {
    action: String,
    role: Option<String>,
    overrides: usize,
    allowed: bool,
    decision: PolicyDecision,
    explanation: String,
}

/// Symbols resolve to their wire identifier; anything else is taken verbatim.
fn resolve_action(raw: &str) -> String {
    match raw.parse::<Action>() {
        Ok(action) => action.as_str().to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Unknown actions are a warning, or an error under `--strict`.
fn check_catalog(action: &str, strict: bool) -> std::result::Result<(), RailgateError> {
    if let Err(unknown) = action.parse::<Action>() {
        if strict {
            return Err(unknown.into());
        }
        output::print_warning(&format!("'{}' is not in the action catalog", action));
    }
    Ok(())
}

fn build_profile(args: &CheckArgs) -> Result<Option<UserProfile>> {
    if args.anonymous {
        return Ok(None);
    }

    let mut profile = match &args.profile {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<UserProfile>(&content)
                .with_context(|| format!("Failed to parse profile {}", path.display()))?
        }
        None => UserProfile::new(),
    };

    if let Some(role) = &args.role {
        profile.role = Some(RoleName::new(role.as_str()));
    }
    for action in &args.allow {
        profile = profile.allow(resolve_action(action));
    }
    for action in &args.deny {
        profile = profile.deny(resolve_action(action));
    }

    Ok(Some(profile))
}

/// Returns whether the action is allowed.
pub fn execute(
    args: CheckArgs,
    engine: &PolicyEngine,
    strict: bool,
    format: OutputFormat,
) -> Result<bool> {
    let action = resolve_action(&args.action);
    check_catalog(&action, strict)?;

    let profile = build_profile(&args)?;
    if let Some(role) = profile.as_ref().and_then(|p| p.role_name()) {
        if !engine.knows_role(role) {
            output::print_warning(&format!("Role '{}' is not in the role table", role));
        }
    }

    let decision = engine.decide(profile.as_ref(), &action);
    let report = CheckReport {
        action: action.clone(),
        role: profile.as_ref().and_then(|p| p.role_name()).map(str::to_string),
        overrides: profile.as_ref().map_or(0, UserProfile::override_count),
        allowed: decision.is_allowed(),
        decision,
        explanation: decision.to_string(),
    };

    match format {
        OutputFormat::Table => println!(
            "{} {} ({})",
            output::verdict(report.allowed),
            report.action,
            report.explanation
        ),
        _ => output::print_item(&report, format)?,
    }

    Ok(report.allowed)
}
