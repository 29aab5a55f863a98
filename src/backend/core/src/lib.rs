//! # Railgate Core
//!
//! Permission evaluation for the operations dashboard (planning, journal,
//! documents, directory, transport lines, PMR assistance, ...).
//!
//! ## Architecture
//!
//! - **RBAC**: Action catalog, role default grants, and the evaluation engine
//! - **Config**: File and environment configuration
//! - **Telemetry**: Structured logging
//! - **Error**: Crate error type with HTTP mapping

pub mod config;
pub mod error;
pub mod rbac;
pub mod telemetry;

pub use error::{ErrorCode, RailgateError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, PolicyConfig};
    pub use crate::error::{ErrorCode, RailgateError, Result};
    pub use crate::rbac::{
        Action, ActionId, AllowReason, DenyReason, GrantSet, PolicyDecision, PolicyEngine,
        PolicyError, PredefinedRole, RbacContext, RequirePermissionLayer, RoleDefaults, RoleName,
        UserProfile,
    };
}
