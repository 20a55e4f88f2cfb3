//! Instance list and detail views.

use serde_json::json;

use panelkit_protocols::{ComponentMeta, Panel, RequestContext, RouteTable, ViewResponse};

const INSTANCES: [(&str, &str, &str); 3] = [
    ("i-001", "web-1", "ACTIVE"),
    ("i-002", "web-2", "ACTIVE"),
    ("i-003", "batch", "SHUTOFF"),
];

pub struct InstancesPanel {
    meta: ComponentMeta,
}

impl Default for InstancesPanel {
    fn default() -> Self {
        Self {
            meta: ComponentMeta::new("instances", "Instances").with_permissions(["compute"]),
        }
    }
}

impl Panel for InstancesPanel {
    fn meta(&self) -> &ComponentMeta {
        &self.meta
    }

    fn routes(&self) -> RouteTable {
        RouteTable::new()
            .view("", "index", |_| {
                let instances: Vec<_> = INSTANCES
                    .iter()
                    .map(|(id, name, status)| json!({"id": id, "name": name, "status": status}))
                    .collect();
                ViewResponse::ok(json!({ "instances": instances }))
            })
            .view("{instance_id}/", "detail", detail)
    }
}

fn detail(req: &RequestContext) -> ViewResponse {
    let id = req.param("instance_id").unwrap_or_default();
    match INSTANCES.iter().find(|(instance_id, _, _)| *instance_id == id) {
        Some((id, name, status)) => {
            ViewResponse::ok(json!({"id": id, "name": name, "status": status}))
        }
        None => ViewResponse::with_status(
            404,
            json!({ "error": format!("Instance {id} not found") }),
        ),
    }
}
