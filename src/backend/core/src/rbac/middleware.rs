//! Axum route guard that enforces a required action on requests.
//!
//! The session layer is expected to place the caller's [`UserProfile`] in the
//! request extensions. A request without one is treated as anonymous and is
//! rejected like any other denial.

use axum::{
    body::Body,
    extract::{FromRequestParts, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::future::BoxFuture;
use metrics::counter;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::warn;

use super::actions::ActionId;
use super::models::{RoleName, UserProfile};
use super::policy::{PolicyDecision, PolicyEngine, PolicyError};
use crate::error::RailgateError;

// ═══════════════════════════════════════════════════════════════════════════════
// RBAC Context (extracted in handlers)
// ═══════════════════════════════════════════════════════════════════════════════

/// Outcome of the guard, available to downstream handlers.
#[derive(Debug, Clone)]
pub struct RbacContext {
    /// The action that was checked.
    pub action: ActionId,
    /// Role of the caller, if any.
    pub role: Option<RoleName>,
    /// The allowing decision.
    pub decision: PolicyDecision,
}

/// Axum extractor for `RbacContext`.
#[axum::async_trait]
impl<S> FromRequestParts<S> for RbacContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RbacContext>()
            .cloned()
            .ok_or_else(|| {
                let body = serde_json::json!({
                    "success": false,
                    "error": {
                        "code": "MISSING_RBAC_CONTEXT",
                        "message": "Authorization context not available. Ensure RBAC middleware is applied.",
                    }
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tower Layer
// ═══════════════════════════════════════════════════════════════════════════════

/// Layer that wraps services with a permission check.
///
/// # Example
///
/// ```rust,ignore
/// use railgate_core::rbac::{Action, PolicyEngine, RequirePermissionLayer};
///
/// let engine = PolicyEngine::builtin();
///
/// let app = Router::new()
///     .route("/api/planning", post(save_planning))
///     .layer(RequirePermissionLayer::new(engine.clone(), Action::PlanningWrite));
/// ```
#[derive(Debug, Clone)]
pub struct RequirePermissionLayer {
    engine: PolicyEngine,
    action: ActionId,
}

impl RequirePermissionLayer {
    /// Require `action` on every request through this layer.
    pub fn new(engine: PolicyEngine, action: impl Into<ActionId>) -> Self {
        Self {
            engine,
            action: action.into(),
        }
    }

    pub fn action(&self) -> &ActionId {
        &self.action
    }
}

impl<S> Layer<S> for RequirePermissionLayer {
    type Service = RequirePermissionService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequirePermissionService {
            inner,
            engine: self.engine.clone(),
            action: self.action.clone(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tower Service
// ═══════════════════════════════════════════════════════════════════════════════

/// Service that enforces a required action per request.
#[derive(Debug, Clone)]
pub struct RequirePermissionService<S> {
    inner: S,
    engine: PolicyEngine,
    action: ActionId,
}

impl<S> Service<Request<Body>> for RequirePermissionService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let engine = self.engine.clone();
        let action = self.action.clone();
        // Take the service that was driven to readiness, leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let profile = request.extensions().get::<UserProfile>();
            let decision = engine.decide(profile, action.as_str());
            let role = profile.and_then(|p| p.role.clone());

            counter!(
                "authorization_decisions_total",
                "outcome" => decision.outcome()
            )
            .increment(1);

            if let PolicyDecision::Deny(reason) = decision {
                warn!(
                    action = %action,
                    role = role.as_ref().map(RoleName::as_str).unwrap_or("-"),
                    reason = %reason,
                    "Permission denied"
                );
                let error = RailgateError::from(PolicyError::PermissionDenied { action, reason });
                return Ok(error.into_response());
            }

            request.extensions_mut().insert(RbacContext {
                action,
                role,
                decision,
            });

            inner.call(request).await
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::actions::Action;

    #[test]
    fn test_layer_action_from_catalog() {
        let layer = RequirePermissionLayer::new(PolicyEngine::builtin(), Action::PmrWrite);
        assert_eq!(layer.action().as_str(), "pmr:write");
    }

    #[test]
    fn test_layer_action_from_string() {
        let layer = RequirePermissionLayer::new(PolicyEngine::builtin(), "reports:export");
        assert_eq!(layer.action().as_str(), "reports:export");
    }

    #[test]
    fn test_rbac_context_creation() {
        let ctx = RbacContext {
            action: Action::BusRead.into(),
            role: Some(RoleName::new("user")),
            decision: PolicyDecision::Allow(crate::rbac::policy::AllowReason::RoleDefault),
        };
        assert_eq!(ctx.action.as_str(), "bus:read");
        assert!(ctx.decision.is_allowed());
    }
}
