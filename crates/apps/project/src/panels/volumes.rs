use serde_json::json;

use panelkit_protocols::{ComponentMeta, Panel, RouteTable, ViewResponse};

pub struct VolumesPanel {
    meta: ComponentMeta,
}

impl Default for VolumesPanel {
    fn default() -> Self {
        Self {
            meta: ComponentMeta::new("volumes", "Volumes")
                .with_permissions(["compute"])
                .with_policy_rules(["volume:get_all"]),
        }
    }
}

impl Panel for VolumesPanel {
    fn meta(&self) -> &ComponentMeta {
        &self.meta
    }

    fn routes(&self) -> RouteTable {
        RouteTable::new().view("", "index", |_| {
            ViewResponse::ok(json!({
                "volumes": [
                    {"id": "v-001", "size_gb": 20},
                    {"id": "v-002", "size_gb": 100},
                ]
            }))
        })
    }
}
