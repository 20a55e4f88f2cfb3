//! Network panel, added through customization.

use serde_json::json;
use tracing::debug;

use panelkit_protocols::{ComponentMeta, Panel, RouteTable, ViewResponse};

/// Set to any non-empty value to keep the panel from registering.
pub const DISABLE_NETWORK_ENV: &str = "PANELKIT_DISABLE_NETWORK";

pub struct NetworkPanel {
    meta: ComponentMeta,
}

impl Default for NetworkPanel {
    fn default() -> Self {
        Self {
            meta: ComponentMeta::new("networks", "Networks"),
        }
    }
}

impl Panel for NetworkPanel {
    fn meta(&self) -> &ComponentMeta {
        &self.meta
    }

    fn routes(&self) -> RouteTable {
        RouteTable::new().view("", "index", |_| {
            ViewResponse::ok(json!({ "networks": ["public", "private"] }))
        })
    }

    fn can_register() -> bool {
        let disabled = std::env::var(DISABLE_NETWORK_ENV).is_ok_and(|value| !value.is_empty());
        if disabled {
            debug!(env = DISABLE_NETWORK_ENV, "Network panel disabled");
        }
        !disabled
    }
}
