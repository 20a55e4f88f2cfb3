use serde_json::json;

use panelkit_protocols::{ComponentMeta, Panel, RouteTable, ViewResponse};

pub struct OverviewPanel {
    meta: ComponentMeta,
}

impl Default for OverviewPanel {
    fn default() -> Self {
        Self {
            meta: ComponentMeta::new("overview", "Overview"),
        }
    }
}

impl Panel for OverviewPanel {
    fn meta(&self) -> &ComponentMeta {
        &self.meta
    }

    fn routes(&self) -> RouteTable {
        RouteTable::new().view("", "index", |req| {
            ViewResponse::ok(json!({
                "dashboard": req.dashboard,
                "panel": req.panel,
                "usage": {"instances": 3, "volumes": 2},
            }))
        })
    }
}
