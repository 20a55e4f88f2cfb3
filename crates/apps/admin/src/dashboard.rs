use panelkit_protocols::{ComponentMeta, Dashboard, PanelEntry, PanelGroupSpec};

pub struct AdminDashboard {
    meta: ComponentMeta,
}

impl Default for AdminDashboard {
    fn default() -> Self {
        Self {
            meta: ComponentMeta::new("admin", "Admin").with_permissions(["admin"]),
        }
    }
}

impl Dashboard for AdminDashboard {
    fn meta(&self) -> &ComponentMeta {
        &self.meta
    }

    fn package(&self) -> &str {
        crate::PACKAGE
    }

    fn panels(&self) -> Vec<PanelEntry> {
        vec![
            PanelGroupSpec::new("system")
                .with_name("System")
                .with_panels(["hypervisors", "defaults"])
                .into(),
        ]
    }

    fn default_panel(&self) -> Option<&str> {
        Some("hypervisors")
    }
}
