//! Panels of the admin dashboard.

use serde_json::json;

use panelkit_protocols::{ComponentMeta, Panel, RouteTable, ViewResponse};

pub struct HypervisorsPanel {
    meta: ComponentMeta,
}

impl Default for HypervisorsPanel {
    fn default() -> Self {
        Self {
            meta: ComponentMeta::new("hypervisors", "Hypervisors"),
        }
    }
}

impl Panel for HypervisorsPanel {
    fn meta(&self) -> &ComponentMeta {
        &self.meta
    }

    fn routes(&self) -> RouteTable {
        RouteTable::new().view("", "index", |_| {
            ViewResponse::ok(json!({
                "hypervisors": [
                    {"host": "compute-1", "vcpus_used": 12},
                    {"host": "compute-2", "vcpus_used": 4},
                ]
            }))
        })
    }
}

pub struct DefaultsPanel {
    meta: ComponentMeta,
}

impl Default for DefaultsPanel {
    fn default() -> Self {
        Self {
            meta: ComponentMeta::new("defaults", "Defaults"),
        }
    }
}

impl Panel for DefaultsPanel {
    fn meta(&self) -> &ComponentMeta {
        &self.meta
    }

    fn routes(&self) -> RouteTable {
        RouteTable::new().view("", "index", |_| {
            ViewResponse::ok(json!({ "quotas": {"instances": 10, "cores": 20} }))
        })
    }
}
