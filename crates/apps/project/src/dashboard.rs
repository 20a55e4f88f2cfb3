//! The project dashboard.

use panelkit_protocols::{ComponentMeta, Dashboard, PanelEntry, PanelGroupSpec};

pub struct ProjectDashboard {
    meta: ComponentMeta,
}

impl Default for ProjectDashboard {
    fn default() -> Self {
        Self {
            meta: ComponentMeta::new("project", "Project").with_permissions(["project"]),
        }
    }
}

impl Dashboard for ProjectDashboard {
    fn meta(&self) -> &ComponentMeta {
        &self.meta
    }

    fn package(&self) -> &str {
        crate::PACKAGE
    }

    fn panels(&self) -> Vec<PanelEntry> {
        vec![
            PanelGroupSpec::new("compute")
                .with_name("Compute")
                .with_panels(["overview", "instances", "volumes"])
                .into(),
        ]
    }

    fn default_panel(&self) -> Option<&str> {
        Some("overview")
    }
}
