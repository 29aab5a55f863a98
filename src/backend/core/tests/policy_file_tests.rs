//! Integration tests for loading role tables from policy files.

use railgate_core::config::PolicyConfig;
use railgate_core::rbac::{load_policy_file, PolicyEngine, PolicySourceError, UserProfile};
use std::fs;
use tempfile::TempDir;

const POLICY: &str = r#"
version = 5

[roles]
moderator = ["users:manage", "planning:read", "planning:write"]
user = ["planning:read"]
auditor = ["audit:read", "journal:read"]
"#;

fn write_policy(dir: &TempDir, content: &str) -> String {
    let path = dir.path().join("policy.toml");
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_engine_from_policy_file() {
    let tmp = TempDir::new().unwrap();
    let config = PolicyConfig {
        path: Some(write_policy(&tmp, POLICY)),
        strict: true,
    };

    let engine = PolicyEngine::from_config(&config).unwrap();
    assert_eq!(engine.snapshot().version(), 5);

    let auditor = UserProfile::with_role("auditor");
    assert!(engine.evaluate(Some(&auditor), "audit:read"));
    assert!(!engine.evaluate(Some(&auditor), "journal:write"));

    // The file replaces the builtin table wholesale.
    let user = UserProfile::with_role("user");
    assert!(!engine.evaluate(Some(&user), "journal:read"));

    // Admin needs no table entry.
    assert!(engine.evaluate(Some(&UserProfile::with_role("admin")), "darts:delete"));
}

#[test]
fn test_hot_reload_from_file() {
    let tmp = TempDir::new().unwrap();
    let engine = PolicyEngine::builtin();
    let user = UserProfile::with_role("user");
    assert!(engine.evaluate(Some(&user), "journal:write"));

    let path = write_policy(&tmp, POLICY);
    let previous = engine.replace_table(load_policy_file(&path, false).unwrap());

    assert_eq!(previous.version(), 0);
    assert!(!engine.evaluate(Some(&user), "journal:write"));
    assert!(engine.evaluate(Some(&user), "planning:read"));
}

#[test]
fn test_strict_file_rejects_unknown_action() {
    let tmp = TempDir::new().unwrap();
    let path = write_policy(&tmp, "[roles]\nuser = [\"planning:archive\"]\n");

    let err = load_policy_file(&path, true).unwrap_err();
    assert!(matches!(err, PolicySourceError::UnknownAction { .. }));
    assert!(load_policy_file(&path, false).is_ok());
}

#[test]
fn test_malformed_file() {
    let tmp = TempDir::new().unwrap();
    let path = write_policy(&tmp, "[roles]\nuser = \"planning:read\"\n");
    assert!(matches!(
        load_policy_file(&path, false),
        Err(PolicySourceError::Parse(_))
    ));
}
