//! Integration tests for the route guard.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use railgate_core::rbac::{Action, PolicyEngine, RbacContext, RequirePermissionLayer, UserProfile};
use tower::ServiceExt;

async fn handler(ctx: RbacContext) -> String {
    format!("{} {}", ctx.action, ctx.decision)
}

fn app(engine: PolicyEngine, action: Action) -> Router {
    Router::new()
        .route("/protected", get(handler))
        .layer(RequirePermissionLayer::new(engine, action))
}

fn request(profile: Option<UserProfile>) -> Request<Body> {
    let mut request = Request::builder()
        .uri("/protected")
        .body(Body::empty())
        .unwrap();
    if let Some(profile) = profile {
        request.extensions_mut().insert(profile);
    }
    request
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_allowed_request_reaches_handler() {
    let app = app(PolicyEngine::builtin(), Action::JournalWrite);
    let response = app
        .oneshot(request(Some(UserProfile::with_role("user"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "journal:write allowed: role default grant");
}

#[tokio::test]
async fn test_denied_request_is_forbidden() {
    let app = app(PolicyEngine::builtin(), Action::DocumentsDelete);
    let response = app
        .oneshot(request(Some(UserProfile::with_role("moderator"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
    assert_eq!(
        body["error"]["message"],
        "You do not have permission: documents:delete"
    );
}

#[tokio::test]
async fn test_missing_profile_is_forbidden() {
    let app = app(PolicyEngine::builtin(), Action::PlanningRead);
    let response = app.oneshot(request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_override_grants_through_guard() {
    let app = app(PolicyEngine::builtin(), Action::UsersBan);
    let profile = UserProfile::with_role("moderator").allow(Action::UsersBan);
    let response = app.oneshot(request(Some(profile))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "users:ban allowed: explicit user override");
}

#[tokio::test]
async fn test_admin_passes_any_guard() {
    let app = app(PolicyEngine::builtin(), Action::AuditRead);
    let profile = UserProfile::with_role("admin").deny(Action::AuditRead);
    let response = app.oneshot(request(Some(profile))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_guard_follows_table_replacement() {
    let engine = PolicyEngine::builtin();
    let guarded = app(engine.clone(), Action::RepertoireRead);

    let response = guarded
        .clone()
        .oneshot(request(Some(UserProfile::with_role("user"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    engine.replace_table(railgate_core::rbac::RoleDefaults::empty());

    let response = guarded
        .oneshot(request(Some(UserProfile::with_role("user"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_handler_without_guard_cannot_extract_context() {
    let app: Router = Router::new().route("/protected", get(handler));
    let response = app.oneshot(request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
