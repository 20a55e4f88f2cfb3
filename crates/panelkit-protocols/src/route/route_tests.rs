use super::*;
use crate::access::User;
use crate::error::AccessError;
use serde_json::json;

fn echo(label: &'static str) -> impl Fn(&RequestContext) -> ViewResponse + Send + Sync + 'static {
    move |req: &RequestContext| {
        ViewResponse::ok(json!({
            "view": label,
            "dashboard": req.dashboard,
            "panel": req.panel,
        }))
    }
}

fn panel_table() -> RouteTable {
    RouteTable::new()
        .view("", "index", echo("instances.index"))
        .view("{instance_id}/", "detail", echo("instances.detail"))
}

fn site_table() -> RouteTable {
    let dashboard = RouteTable::new()
        .include("instances/", Some("instances".to_string()), panel_table())
        .include(
            "",
            Some("overview".to_string()),
            RouteTable::new().view("", "index", echo("overview.index")),
        );
    RouteTable::new().include("project/", Some("project".to_string()), dashboard)
}

#[test]
fn test_flatten_paths_in_order() {
    let flat = site_table().flatten();
    let paths: Vec<&str> = flat.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "/project/instances/",
            "/project/instances/{instance_id}/",
            "/project/",
        ]
    );
}

#[test]
fn test_flatten_namespaced_names() {
    let flat = site_table().flatten();
    assert_eq!(flat[0].name.as_deref(), Some("project:instances:index"));
    assert_eq!(flat[2].name.as_deref(), Some("project:overview:index"));
}

#[test]
fn test_reverse_nested() {
    let table = site_table();
    assert_eq!(
        table.reverse("project:instances:index").as_deref(),
        Some("/project/instances/")
    );
    assert_eq!(
        table.reverse("project:overview:index").as_deref(),
        Some("/project/")
    );
}

#[test]
fn test_reverse_unknown_name() {
    let table = site_table();
    assert!(table.reverse("project:volumes:index").is_none());
    assert!(table.reverse("project").is_none());
}

#[test]
fn test_reverse_skips_parameterized_patterns() {
    let table = site_table();
    assert!(table.reverse("project:instances:detail").is_none());
}

#[test]
fn test_reverse_through_anonymous_include() {
    let table = RouteTable::new().include(
        "admin/",
        None,
        RouteTable::new().view("users/", "users", echo("users")),
    );
    assert_eq!(table.reverse("users").as_deref(), Some("/admin/users/"));
}

#[test]
fn test_reverse_first_match_wins() {
    let table = RouteTable::new()
        .view("first/", "index", echo("first"))
        .view("second/", "index", echo("second"));
    assert_eq!(table.reverse("index").as_deref(), Some("/first/"));
}

#[test]
fn test_decorate_applies_recursively() {
    let table = site_table().decorated(&Decorator::RequireAuth);
    assert!(table.flatten().iter().all(|r| r.handler.requires_auth()));
}

#[test]
fn test_decorate_unions_permissions() {
    let table = panel_table()
        .decorated(&Decorator::require_perms(["compute"]))
        .decorated(&Decorator::require_perms(["project"]));
    let flat = table.flatten();
    let perms: Vec<&str> = flat[0]
        .handler
        .required_perms()
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(perms, vec!["compute", "project"]);
}

#[test]
fn test_context_tags_keep_innermost() {
    let table = panel_table()
        .decorated(&Decorator::CurrentPanel("instances".to_string()))
        .decorated(&Decorator::CurrentPanel("outer".to_string()))
        .decorated(&Decorator::CurrentDashboard("project".to_string()));
    let handler = &table.flatten()[0].handler;
    assert_eq!(handler.panel(), Some("instances"));
    assert_eq!(handler.dashboard(), Some("project"));
}

#[test]
fn test_handler_requires_auth() {
    let mut handler = Handler::new(echo("view"));
    handler.decorate(&Decorator::RequireAuth);

    let mut anonymous = RequestContext::new("/project/");
    assert_eq!(handler.call(&mut anonymous), Err(AccessError::NotAuthenticated));

    let mut signed_in = RequestContext::new("/project/").with_user(User::authenticated("alice"));
    assert!(handler.call(&mut signed_in).is_ok());
}

#[test]
fn test_handler_requires_perms() {
    let mut handler = Handler::new(echo("view"));
    handler.decorate(&Decorator::require_perms(["admin"]));

    let mut request = RequestContext::new("/admin/").with_user(User::authenticated("alice"));
    assert_eq!(
        handler.call(&mut request),
        Err(AccessError::NotAuthorized("/admin/".to_string()))
    );

    let mut request = RequestContext::new("/admin/")
        .with_user(User::authenticated("root").with_permissions(["admin"]));
    assert!(handler.call(&mut request).is_ok());
}

#[test]
fn test_handler_auth_checked_before_perms() {
    let mut handler = Handler::new(echo("view"));
    handler.decorate(&Decorator::require_perms(["admin"]));
    handler.decorate(&Decorator::RequireAuth);

    let mut request = RequestContext::new("/admin/");
    assert_eq!(handler.call(&mut request), Err(AccessError::NotAuthenticated));
}

#[test]
fn test_handler_perms_require_authenticated_user() {
    let mut handler = Handler::new(echo("view"));
    handler.decorate(&Decorator::require_perms(["admin"]));

    let user = User {
        id: "guest".to_string(),
        authenticated: false,
        ..User::anonymous()
    }
    .with_permissions(["admin"]);
    let mut request = RequestContext::new("/admin/").with_user(user);
    assert_eq!(
        handler.call(&mut request),
        Err(AccessError::NotAuthorized("/admin/".to_string()))
    );
}

#[test]
fn test_handler_tags_request() {
    let mut handler = Handler::new(echo("view"));
    handler.decorate(&Decorator::CurrentPanel("instances".to_string()));
    handler.decorate(&Decorator::CurrentDashboard("project".to_string()));

    let mut request = RequestContext::new("/project/instances/");
    let response = handler.call(&mut request).unwrap();
    assert_eq!(request.dashboard.as_deref(), Some("project"));
    assert_eq!(request.panel.as_deref(), Some("instances"));
    assert_eq!(response.body["panel"], "instances");
    assert_eq!(response.status, 200);
}

#[test]
fn test_request_params() {
    let mut request = RequestContext::new("/project/instances/abc/");
    request.params.insert("instance_id".to_string(), "abc".to_string());
    assert_eq!(request.param("instance_id"), Some("abc"));
    assert_eq!(request.param("missing"), None);
}

#[test]
fn test_extend_and_len() {
    let mut table = panel_table();
    table.extend(RouteTable::new().view("extra/", "extra", echo("extra")));
    assert_eq!(table.len(), 3);
    assert!(!table.is_empty());
    assert!(RouteTable::new().is_empty());
}
