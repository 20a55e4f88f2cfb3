//! Navigation tree.

use serde::Serialize;

use panelkit_protocols::{AccessContext, Panel, RegistryError};

use crate::site::Site;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavPanel {
    pub slug: String,
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavGroup {
    pub slug: String,
    /// Group name, or the dashboard name for unnamed groups.
    pub name: String,
    pub panels: Vec<NavPanel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavDashboard {
    pub slug: String,
    pub name: String,
    pub url: Option<String>,
    pub groups: Vec<NavGroup>,
}

impl Site {
    /// Navigation visible in `ctx`.
    ///
    /// Dashboards and panels appear when their nav setting is visible and
    /// they are accessible. Empty groups are dropped.
    pub fn navigation(&self, ctx: &AccessContext) -> Result<Vec<NavDashboard>, RegistryError> {
        let routes = self.routes()?;
        let index_url = |dashboard: &str, panel: &dyn Panel| {
            routes.reverse(&format!(
                "{}:{}:{}:{}",
                self.namespace(),
                dashboard,
                panel.slug(),
                panel.index_route_name()
            ))
        };
        let mut out = Vec::new();

        for dashboard in self.get_dashboards()? {
            let meta = dashboard.definition().meta();
            if !(meta.nav.is_visible(ctx) && dashboard.can_access(ctx)) {
                continue;
            }

            let mut groups = Vec::new();
            for group in dashboard.get_panel_groups() {
                let panels: Vec<NavPanel> = group
                    .iter(&dashboard)
                    .filter(|panel| {
                        panel.meta().nav.is_visible(ctx)
                            && dashboard.panel_can_access(panel.as_ref(), ctx)
                    })
                    .map(|panel| NavPanel {
                        slug: panel.slug().to_string(),
                        name: panel.name().to_string(),
                        url: index_url(dashboard.slug(), panel.as_ref()),
                    })
                    .collect();
                if panels.is_empty() {
                    continue;
                }
                groups.push(NavGroup {
                    name: group
                        .name
                        .clone()
                        .unwrap_or_else(|| dashboard.name().to_string()),
                    slug: group.slug,
                    panels,
                });
            }

            let url = dashboard
                .default_panel()
                .and_then(|default| dashboard.get_panel(&default))
                .and_then(|panel| index_url(dashboard.slug(), panel.as_ref()));

            out.push(NavDashboard {
                slug: dashboard.slug().to_string(),
                name: dashboard.name().to_string(),
                url,
                groups,
            });
        }
        Ok(out)
    }
}
