//! Structured logging with JSON/pretty/compact formats.

use serde::Deserialize;
use std::collections::HashMap;
use tracing_subscriber::{
    filter::Directive,
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::error::RailgateError;

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Global log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty or compact)
    #[serde(default)]
    pub format: LogFormat,

    /// Per-module log levels
    #[serde(default)]
    pub module_levels: HashMap<String, String>,

    /// Whether to include target (module path)
    #[serde(default = "default_include_target")]
    pub include_target: bool,

    /// Stream the log lines go to
    #[serde(default)]
    pub writer: LogWriter,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            module_levels: HashMap::new(),
            include_target: default_include_target(),
            writer: LogWriter::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format for production/structured logging
    #[default]
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact single-line format
    Compact,
}

/// Log destination.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogWriter {
    #[default]
    Stdout,
    /// Keeps stdout free for command output
    Stderr,
}

impl LogWriter {
    fn make_writer(self) -> BoxMakeWriter {
        match self {
            Self::Stdout => BoxMakeWriter::new(std::io::stdout),
            Self::Stderr => BoxMakeWriter::new(std::io::stderr),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_include_target() -> bool {
    true
}

impl LoggingConfig {
    /// Build the filter from the global level plus per-module directives.
    pub fn env_filter(&self) -> Result<EnvFilter, RailgateError> {
        let mut filter =
            EnvFilter::try_new(&self.level).map_err(|e| RailgateError::Logging(e.to_string()))?;

        for (module, level) in &self.module_levels {
            let directive = format!("{}={}", module, level)
                .parse::<Directive>()
                .map_err(|e| RailgateError::Logging(e.to_string()))?;
            filter = filter.add_directive(directive);
        }

        Ok(filter)
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), RailgateError> {
    let filter = config.env_filter()?;
    let registry = tracing_subscriber::registry().with(filter);

    let layer = fmt::layer()
        .with_writer(config.writer.make_writer())
        .with_target(config.include_target);

    let result = match config.format {
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
    };

    result.map_err(|e| RailgateError::Logging(e.to_string()))
}
