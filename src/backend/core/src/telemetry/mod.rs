//! Telemetry: structured logging for the engine and its collaborators.
//!
//! The engine itself emits nothing per decision; logging covers policy
//! loading, table replacement, and route-guard denials.
//!
//! # Example
//!
//! ```rust,no_run
//! use railgate_core::telemetry::{init_logging, LoggingConfig};
//!
//! init_logging(&LoggingConfig::default()).expect("Failed to initialize logging");
//! ```

pub mod logging;

pub use logging::{init_logging, LogFormat, LogWriter, LoggingConfig};
