use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

fn deny_all() -> Arc<dyn PolicyEvaluator> {
    Arc::new(|_rules: &[String], _ctx: &AccessContext| false)
}

fn allow_rule(name: &'static str) -> Arc<dyn PolicyEvaluator> {
    Arc::new(move |rules: &[String], _ctx: &AccessContext| rules.iter().any(|r| r == name))
}

#[test]
fn test_user_authenticated() {
    let user = User::authenticated("alice");
    assert!(user.authenticated);
    assert_eq!(user.id, "alice");
    assert_eq!(user.name, "alice");
}

#[test]
fn test_user_has_perms() {
    let user = User::authenticated("alice").with_permissions(["compute", "network"]);
    let required = vec!["compute".to_string()];
    assert!(user.has_perms(&required));

    let required = vec!["compute".to_string(), "admin".to_string()];
    assert!(!user.has_perms(&required));
}

#[test]
fn test_user_has_perms_empty_requirement() {
    let user = User::anonymous();
    assert!(user.has_perms(&Vec::<String>::new()));
}

#[test]
fn test_check_rules_without_policy() {
    let ctx = AccessContext::anonymous();
    assert!(ctx.check_rules(&["compute:get".to_string()]));
}

#[test]
fn test_check_rules_empty_rule_set_is_allowed() {
    let ctx = AccessContext::anonymous().with_policy(deny_all());
    assert!(ctx.check_rules(&[]));
}

#[test]
fn test_check_rules_denied() {
    let ctx = AccessContext::anonymous().with_policy(deny_all());
    assert!(!ctx.check_rules(&["compute:get".to_string()]));
}

#[test]
fn test_check_rules_any_rule_passes() {
    let ctx = AccessContext::anonymous().with_policy(allow_rule("network:get"));
    let rules = vec!["compute:get".to_string(), "network:get".to_string()];
    assert!(ctx.check_rules(&rules));
}

#[test]
fn test_is_authenticated() {
    assert!(!AccessContext::anonymous().is_authenticated());
    assert!(!AccessContext::for_user(User::anonymous()).is_authenticated());
    assert!(AccessContext::for_user(User::authenticated("bob")).is_authenticated());
}

#[test]
fn test_cached_without_cache_always_computes() {
    let ctx = AccessContext::anonymous();
    let calls = AtomicUsize::new(0);
    for _ in 0..3 {
        ctx.cached("key", || {
            calls.fetch_add(1, Ordering::SeqCst);
            true
        });
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_cached_memoizes_per_token() {
    let cache = Arc::new(AccessCache::new());
    let ctx = AccessContext::for_user(User::authenticated("alice").with_token("t1"))
        .with_cache(cache.clone());
    let calls = AtomicUsize::new(0);

    for _ in 0..3 {
        let allowed = ctx.cached("project", || {
            calls.fetch_add(1, Ordering::SeqCst);
            false
        });
        assert!(!allowed);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_invalidated_by_new_token() {
    let cache = Arc::new(AccessCache::new());
    assert!(cache.get_or_compute(Some("t1"), "project", || true));
    assert!(cache.get_or_compute(Some("t1"), "project", || false));

    // A new session token starts from an empty cache.
    assert!(!cache.get_or_compute(Some("t2"), "project", || false));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_allows_nested_lookups() {
    let cache = Arc::new(AccessCache::new());
    let ctx = AccessContext::anonymous().with_cache(cache.clone());
    let outer = ctx.cached("dashboard", || ctx.cached("dashboard.panel", || true));
    assert!(outer);
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_user_deserialization() {
    let json = r#"{"id": "carol", "authenticated": true, "permissions": ["admin"]}"#;
    let user: User = serde_json::from_str(json).unwrap();
    assert!(user.authenticated);
    assert!(user.permissions.contains("admin"));
    assert!(user.token.is_none());
}
