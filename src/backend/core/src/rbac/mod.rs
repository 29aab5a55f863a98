//! Role-Based Access Control (RBAC) for the operations dashboard.
//!
//! This module provides:
//! - **Actions**: The closed catalog of `resource:verb` actions
//! - **Models**: User profiles, role names, and grant sets
//! - **Predefined Roles**: Admin, Moderator, User with default grant sets
//! - **Policy Engine**: Decides whether a profile may perform an action
//! - **Policy Files**: Optional TOML source for the role-defaults table
//! - **Authorization Middleware**: Axum route guard built on the engine
//!
//! # Usage
//!
//! ```rust,ignore
//! use railgate_core::rbac::{Action, PolicyEngine, RequirePermissionLayer, UserProfile};
//!
//! // Check permissions programmatically
//! let engine = PolicyEngine::builtin();
//! let profile = UserProfile::with_role("user").allow(Action::BusDelete);
//!
//! let allowed = engine.evaluate(Some(&profile), Action::BusDelete.as_str());
//!
//! // Use as Axum middleware
//! let app = Router::new()
//!     .route("/api/bus", delete(remove_line))
//!     .layer(RequirePermissionLayer::new(engine, Action::BusDelete));
//! ```

pub mod actions;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod policy_file;
pub mod roles;

pub use actions::{Action, ActionId, UnknownAction, MODULE_RESOURCES};
pub use middleware::{RbacContext, RequirePermissionLayer, RequirePermissionService};
pub use models::{GrantSet, RoleName, UserProfile};
pub use policy::{
    decide, evaluate, AllowReason, DenyReason, PolicyDecision, PolicyEngine, PolicyError,
    SUPER_ADMIN_ROLE,
};
pub use policy_file::{load_policy_file, parse_policy, PolicySourceError};
pub use roles::{PredefinedRole, RoleDefaults, RoleDefaultsBuilder};
