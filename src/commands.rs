//! Subcommand implementations.

use std::fmt::Write as _;
use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use panelkit_api::{PanelServer, ServerConfig};
use panelkit_config::{Config, ConfigValidator};
use panelkit_core::{CompiledRoutes, NavDashboard, Site};
use panelkit_protocols::User;

use crate::cli::OutputFormat;
use crate::register::build_site;

pub(crate) fn routes(site: &Site, format: OutputFormat) -> anyhow::Result<()> {
    let compiled = site.routes()?;
    print!("{}", render_routes(&compiled, format)?);
    Ok(())
}

pub(crate) fn nav(
    site: &Site,
    user: Option<String>,
    permissions: Vec<String>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let user = user.map(|id| User::authenticated(id).with_permissions(permissions));
    let tree = site.navigation(&site.access_context(user))?;
    print!("{}", render_nav(&tree, format)?);
    Ok(())
}

/// Validate `config`, then build the site and compile its routes.
pub(crate) fn check(config: &Config) -> anyhow::Result<()> {
    let result = ConfigValidator::validate(config)?;
    for warning in &result.warnings {
        warn!(path = %warning.path, "{}", warning.message);
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }
    if !result.is_valid() {
        anyhow::bail!("configuration has {} error(s)", result.errors.len());
    }

    let site = build_site(config)?;
    let compiled = site.routes()?;
    println!(
        "ok: {} dashboard(s), {} route(s)",
        site.registered_dashboards().len(),
        compiled.flatten().len()
    );
    Ok(())
}

pub(crate) async fn serve(site: Arc<Site>, config: ServerConfig) -> anyhow::Result<()> {
    info!("Starting panelkit v{}", env!("CARGO_PKG_VERSION"));
    let server = PanelServer::new(config, site);
    server
        .run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "Failed to listen for shutdown signal");
            }
        })
        .await?;
    Ok(())
}

pub(crate) fn render_routes(compiled: &CompiledRoutes, format: OutputFormat) -> anyhow::Result<String> {
    let routes = compiled.flatten();
    match format {
        OutputFormat::Json => {
            let rows: Vec<_> = routes
                .iter()
                .map(|route| {
                    json!({
                        "path": route.path,
                        "name": route.name,
                        "requires_auth": route.handler.requires_auth(),
                        "permissions": route.handler.required_perms(),
                        "dashboard": route.handler.dashboard(),
                        "panel": route.handler.panel(),
                    })
                })
                .collect();
            Ok(serde_json::to_string_pretty(&rows)? + "\n")
        }
        OutputFormat::Table => {
            let mut out = String::new();
            for route in &routes {
                let perms: Vec<&str> = route
                    .handler
                    .required_perms()
                    .iter()
                    .map(String::as_str)
                    .collect();
                writeln!(
                    out,
                    "{:<40} {:<40} {}{}",
                    route.path,
                    route.name.as_deref().unwrap_or("-"),
                    if route.handler.requires_auth() { "auth " } else { "" },
                    perms.join(",")
                )?;
            }
            Ok(out)
        }
    }
}

pub(crate) fn render_nav(tree: &[NavDashboard], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(tree)? + "\n"),
        OutputFormat::Table => {
            let mut out = String::new();
            for dashboard in tree {
                writeln!(
                    out,
                    "{} ({})",
                    dashboard.name,
                    dashboard.url.as_deref().unwrap_or("-")
                )?;
                for group in &dashboard.groups {
                    writeln!(out, "  {}", group.name)?;
                    for panel in &group.panels {
                        writeln!(
                            out,
                            "    {} ({})",
                            panel.name,
                            panel.url.as_deref().unwrap_or("-")
                        )?;
                    }
                }
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::default_config;

    #[test]
    fn test_render_routes_table() {
        let site = build_site(&default_config()).unwrap();
        let out = render_routes(&site.routes().unwrap(), OutputFormat::Table).unwrap();

        let line = out
            .lines()
            .find(|line| line.starts_with("/project/instances/ "))
            .unwrap();
        assert!(line.contains("panelkit:project:instances:index"));
        assert!(line.contains("auth"));
        assert!(line.contains("compute,project"));
    }

    #[test]
    fn test_render_routes_json() {
        let site = build_site(&default_config()).unwrap();
        let out = render_routes(&site.routes().unwrap(), OutputFormat::Json).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&out).unwrap();

        let root = rows
            .as_array()
            .unwrap()
            .iter()
            .find(|row| row["path"] == "/project/")
            .unwrap();
        assert_eq!(root["panel"], "overview");
        assert_eq!(root["dashboard"], "project");
        assert_eq!(root["requires_auth"], true);
    }

    #[test]
    fn test_render_nav_table() {
        let site = build_site(&default_config()).unwrap();
        let user = User::authenticated("alice").with_permissions(["project"]);
        let tree = site.navigation(&site.access_context(Some(user))).unwrap();
        let out = render_nav(&tree, OutputFormat::Table).unwrap();

        assert!(out.starts_with("Project (/project/)\n  Compute\n"));
        assert!(out.contains("    Instances (/project/instances/)\n"));
    }

    #[test]
    fn test_check_default_config() {
        check(&default_config()).unwrap();
    }

    #[test]
    fn test_check_rejects_invalid_config() {
        let mut config = default_config();
        config.server.port = 0;
        assert!(check(&config).is_err());
    }
}
