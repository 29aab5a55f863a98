//! Configuration management.
//!
//! Values come from an optional file plus `RAILGATE__*` environment variables,
//! e.g. `RAILGATE__POLICY__PATH=/etc/railgate/policy.toml`.

use serde::Deserialize;

use crate::telemetry::LoggingConfig;

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Role table source
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Where the role-defaults table comes from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyConfig {
    /// TOML policy file; the compiled-in table is used when unset.
    pub path: Option<String>,

    /// Reject policy files that grant actions outside the catalog.
    #[serde(default)]
    pub strict: bool,
}

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> crate::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("RAILGATE").separator("__"))
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        Ok(cfg)
    }

    /// Load from a specific file path, with environment overrides.
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("RAILGATE").separator("__"))
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::LogFormat;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert!(cfg.policy.path.is_none());
        assert!(!cfg.policy.strict);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[logging]
level = "debug"
format = "pretty"

[policy]
path = "/etc/railgate/policy.toml"
strict = true
"#
        )
        .unwrap();

        let cfg = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.logging.format, LogFormat::Pretty);
        assert_eq!(cfg.policy.path.as_deref(), Some("/etc/railgate/policy.toml"));
        assert!(cfg.policy.strict);
    }
}
