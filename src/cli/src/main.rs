//! Railgate CLI - inspect the permission catalog, role tables, and decisions.
//!
//! Works offline against the compiled-in role table or a TOML policy file.

mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use railgate_core::config::{Config, PolicyConfig};
use railgate_core::rbac::{load_policy_file, PolicyEngine};
use railgate_core::telemetry::{init_logging, LogFormat, LogWriter};
use tracing::debug;

use commands::policy::PolicyCommands;
use commands::{actions, check, matrix, policy, roles};
use output::OutputFormat;

/// Railgate - permission engine inspection CLI
#[derive(Parser)]
#[command(
    name = "railgate",
    author = "Aezi <aezi.zhu@icloud.com>",
    version = "0.1.0",
    about = "Railgate - permission engine inspection",
    long_about = "CLI tool for listing actions and roles and explaining permission decisions.",
    propagate_version = true
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    output: OutputFormat,

    /// Policy file replacing the compiled-in role table
    #[arg(long, global = true, env = "RAILGATE_POLICY")]
    policy: Option<String>,

    /// Treat actions outside the catalog as errors (policy files and `check`)
    #[arg(long, global = true)]
    strict: bool,

    /// Log level for diagnostics on stderr
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog actions
    Actions(actions::ActionsArgs),

    /// Role table inspection
    #[command(subcommand)]
    Roles(roles::RolesCommands),

    /// Explain whether a profile may perform an action (exit status 1 when denied)
    Check(check::CheckArgs),

    /// Role x action grid
    Matrix(matrix::MatrixArgs),

    /// Policy file operations
    #[command(subcommand)]
    Policy(policy::PolicyCommands),
}

/// Where the role table comes from. Loaded only by commands that evaluate,
/// so `policy validate` can still report on a broken configured policy.
struct PolicySource {
    path: Option<String>,
    strict: bool,
    configured: PolicyConfig,
}

impl PolicySource {
    fn new(cli: &Cli, config: &Config) -> Self {
        Self {
            path: cli.policy.clone(),
            strict: cli.strict,
            configured: config.policy.clone(),
        }
    }

    /// Build the engine from `--policy`, or from `RAILGATE__*` configuration.
    fn engine(&self) -> Result<PolicyEngine> {
        let engine = match &self.path {
            Some(path) => {
                let table = load_policy_file(path, self.strict)
                    .with_context(|| format!("Failed to load policy {}", path))?;
                PolicyEngine::new(table)
            }
            None => {
                let mut policy = self.configured.clone();
                policy.strict |= self.strict;
                PolicyEngine::from_config(&policy).context("Failed to load configured policy")?
            }
        };

        let table = engine.snapshot();
        debug!(version = table.version(), roles = table.role_count(), "Role table ready");
        Ok(engine)
    }
}

fn dispatch(command: Commands, source: &PolicySource, format: OutputFormat) -> Result<bool> {
    match command {
        Commands::Actions(args) => actions::execute(args, format).map(|_| true),
        Commands::Roles(cmd) => roles::execute(cmd, &source.engine()?, format).map(|_| true),
        Commands::Check(args) => check::execute(args, &source.engine()?, source.strict, format),
        Commands::Matrix(args) => matrix::execute(args, &source.engine()?, format).map(|_| true),
        Commands::Policy(PolicyCommands::Validate { file }) => {
            policy::validate(&file, source.strict, format).map(|_| true)
        }
        Commands::Policy(PolicyCommands::Show) => {
            policy::show(&source.engine()?, format).map(|_| true)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let mut config = Config::load().context("Failed to load configuration")?;
    config.logging.level = cli.log_level.clone();
    config.logging.format = LogFormat::Compact;
    config.logging.writer = LogWriter::Stderr;
    init_logging(&config.logging)?;

    let source = PolicySource::new(&cli, &config);
    dispatch(cli.command, &source, cli.output)
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            std::process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn source(path: &str) -> PolicySource {
        PolicySource {
            path: Some(path.to_string()),
            strict: false,
            configured: PolicyConfig::default(),
        }
    }

    #[test]
    fn test_validate_runs_with_broken_configured_policy() {
        let dir = tempfile::TempDir::new().unwrap();
        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[roles\nuser = ").unwrap();
        let mut good = std::fs::File::create(dir.path().join("good.toml")).unwrap();
        writeln!(good, "[roles]\nuser = [\"bus:read\"]").unwrap();

        let source = source(broken.to_str().unwrap());
        assert!(source.engine().is_err());

        let validate = Commands::Policy(PolicyCommands::Validate {
            file: dir.path().join("good.toml").to_string_lossy().into_owned(),
        });
        assert!(dispatch(validate, &source, OutputFormat::Json).unwrap());

        let show = Commands::Policy(PolicyCommands::Show);
        assert!(dispatch(show, &source, OutputFormat::Json).is_err());
    }

    #[test]
    fn test_validate_reports_broken_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[roles\nuser = ").unwrap();

        let source = source(broken.to_str().unwrap());
        let validate = Commands::Policy(PolicyCommands::Validate {
            file: broken.to_string_lossy().into_owned(),
        });
        let err = dispatch(validate, &source, OutputFormat::Json).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid policy file"));
    }
}
