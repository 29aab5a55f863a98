//! Error handling for Railgate Core.
//!
//! Permission checks themselves never fail: a miss is a denial. Errors exist
//! for the edges around the engine: loading policy and configuration,
//! starting logging, and turning a denial into an HTTP response.
//!
//! # Usage
//!
//! ```rust,ignore
//! use railgate_core::error::Result;
//!
//! fn start() -> Result<()> {
//!     let config = railgate_core::config::Config::load()?;
//!     let engine = railgate_core::rbac::PolicyEngine::from_config(&config.policy)?;
//!     Ok(())
//! }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{error, warn};

use crate::rbac::actions::UnknownAction;
use crate::rbac::policy::PolicyError;
use crate::rbac::policy_file::PolicySourceError;

// ═══════════════════════════════════════════════════════════════════════════════
// Result Type Alias
// ═══════════════════════════════════════════════════════════════════════════════

/// A specialized Result type for Railgate operations.
pub type Result<T> = std::result::Result<T, RailgateError>;

// ═══════════════════════════════════════════════════════════════════════════════
// Error Codes
// ═══════════════════════════════════════════════════════════════════════════════

/// Machine-readable error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Authorization (4000-4099)
    Forbidden,

    // Validation (4100-4199)
    UnknownAction,

    // Configuration (5000-5099)
    ConfigurationError,
    InvalidPolicy,
    PolicyUnavailable,

    // Internal (9000-9099)
    InternalError,
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub const fn numeric_code(&self) -> u32 {
        match self {
            Self::Forbidden => 4001,
            Self::UnknownAction => 4100,
            Self::ConfigurationError => 5000,
            Self::InvalidPolicy => 5001,
            Self::PolicyUnavailable => 5002,
            Self::InternalError => 9000,
        }
    }

    /// HTTP status for responses carrying this code.
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UnknownAction => StatusCode::BAD_REQUEST,
            Self::ConfigurationError
            | Self::InvalidPolicy
            | Self::PolicyUnavailable
            | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Railgate Error
// ═══════════════════════════════════════════════════════════════════════════════

/// Crate-level error.
#[derive(Debug, Error)]
pub enum RailgateError {
    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    PolicySource(#[from] PolicySourceError),

    #[error(transparent)]
    UnknownAction(#[from] UnknownAction),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

impl RailgateError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Policy(PolicyError::PermissionDenied { .. }) => ErrorCode::Forbidden,
            Self::PolicySource(PolicySourceError::Io { .. }) => ErrorCode::PolicyUnavailable,
            Self::PolicySource(_) => ErrorCode::InvalidPolicy,
            Self::UnknownAction(_) => ErrorCode::UnknownAction,
            Self::Config(_) => ErrorCode::ConfigurationError,
            Self::Logging(_) => ErrorCode::InternalError,
        }
    }

    pub fn http_status(&self) -> StatusCode {
        self.code().http_status()
    }

    /// Message safe to show to API clients.
    ///
    /// Denials do not reveal which rule decided.
    pub fn user_message(&self) -> String {
        match self {
            Self::Policy(PolicyError::PermissionDenied { action, .. }) => {
                format!("You do not have permission: {}", action)
            }
            Self::UnknownAction(e) => e.to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    fn log(&self) {
        if self.http_status().is_server_error() {
            error!(code = %self.code(), error = %self, "Request failed");
        } else {
            warn!(code = %self.code(), error = %self, "Request rejected");
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP Response
// ═══════════════════════════════════════════════════════════════════════════════

/// Error response for API clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false for errors
    pub success: bool,

    pub error: ErrorInfo,
}

/// Detailed error information for API responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Numeric error code
    pub numeric_code: u32,

    /// User-friendly error message
    pub message: String,
}

impl From<&RailgateError> for ErrorResponse {
    fn from(error: &RailgateError) -> Self {
        let code = error.code();
        Self {
            success: false,
            error: ErrorInfo {
                code,
                numeric_code: code.numeric_code(),
                message: error.user_message(),
            },
        }
    }
}

impl IntoResponse for RailgateError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.http_status();
        let response = ErrorResponse::from(&self);

        (status, Json(response)).into_response()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::actions::{Action, ActionId};
    use crate::rbac::policy::DenyReason;

    fn denied() -> RailgateError {
        PolicyError::PermissionDenied {
            action: ActionId::new("documents:delete"),
            reason: DenyReason::NotGranted,
        }
        .into()
    }

    #[test]
    fn test_denial_maps_to_forbidden() {
        let err = denied();
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(err.user_message(), "You do not have permission: documents:delete");
    }

    #[test]
    fn test_policy_source_codes() {
        let err: RailgateError = PolicySourceError::EmptyRoleName.into();
        assert_eq!(err.code(), ErrorCode::InvalidPolicy);
        assert_eq!(err.user_message(), "Internal server error");

        let err: RailgateError = PolicySourceError::Io {
            path: "missing.toml".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
        .into();
        assert_eq!(err.code(), ErrorCode::PolicyUnavailable);
    }

    #[test]
    fn test_unknown_action_is_bad_request() {
        let err: RailgateError = "reports:export".parse::<Action>().unwrap_err().into();
        assert_eq!(err.code(), ErrorCode::UnknownAction);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.user_message(), "Unknown action: reports:export");

        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(body["error"]["code"], "UNKNOWN_ACTION");
        assert_eq!(body["error"]["numeric_code"], 4100);
    }

    #[test]
    fn test_error_response_body() {
        let body = serde_json::to_value(ErrorResponse::from(&denied())).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "FORBIDDEN");
        assert_eq!(body["error"]["numeric_code"], 4001);
    }

    #[test]
    fn test_into_response_status() {
        let response = denied().into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
