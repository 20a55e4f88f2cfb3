//! Declarative customization entries.
//!
//! Entries use the upper-case keys deployments already write:
//!
//! ```toml
//! [[panel_customization]]
//! name = "_20_instances"
//! PANEL = "instances"
//! PANEL_DASHBOARD = "project"
//! PANEL_GROUP = "compute"
//! ADD_PANEL = "panelkit_app_project.panels.InstancesPanel"
//! ```

use serde::{Deserialize, Serialize};

/// One customization entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizationEntry {
    /// Identity used in log messages, usually the file stem.
    #[serde(default)]
    pub name: String,

    #[serde(rename = "PANEL", default, skip_serializing_if = "Option::is_none")]
    pub panel: Option<String>,

    #[serde(rename = "PANEL_DASHBOARD", default, skip_serializing_if = "Option::is_none")]
    pub panel_dashboard: Option<String>,

    #[serde(rename = "PANEL_GROUP", default, skip_serializing_if = "Option::is_none")]
    pub panel_group: Option<String>,

    #[serde(rename = "PANEL_GROUP_NAME", default, skip_serializing_if = "Option::is_none")]
    pub panel_group_name: Option<String>,

    #[serde(
        rename = "PANEL_GROUP_DASHBOARD",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub panel_group_dashboard: Option<String>,

    #[serde(rename = "DEFAULT_PANEL", default, skip_serializing_if = "Option::is_none")]
    pub default_panel: Option<String>,

    #[serde(rename = "REMOVE_PANEL", default)]
    pub remove_panel: bool,

    /// Component reference, e.g. `"app.panels.NetworkPanel"`.
    #[serde(rename = "ADD_PANEL", default, skip_serializing_if = "Option::is_none")]
    pub add_panel: Option<String>,
}

/// Which marker key an entry carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    PanelGroup,
    Panel,
}

/// What a panel entry does to its panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction<'a> {
    Remove,
    Add(&'a str),
    None,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl CustomizationEntry {
    /// Entry creating a panel group on a dashboard.
    pub fn panel_group(
        slug: impl Into<String>,
        name: impl Into<String>,
        dashboard: impl Into<String>,
    ) -> Self {
        Self {
            panel_group: Some(slug.into()),
            panel_group_name: Some(name.into()),
            panel_group_dashboard: Some(dashboard.into()),
            ..Default::default()
        }
    }

    /// Entry adding the referenced panel component to a dashboard.
    pub fn add_panel(
        panel: impl Into<String>,
        dashboard: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            panel: Some(panel.into()),
            panel_dashboard: Some(dashboard.into()),
            add_panel: Some(reference.into()),
            ..Default::default()
        }
    }

    /// Entry removing a panel from a dashboard.
    pub fn remove_panel(panel: impl Into<String>, dashboard: impl Into<String>) -> Self {
        Self {
            panel: Some(panel.into()),
            panel_dashboard: Some(dashboard.into()),
            remove_panel: true,
            ..Default::default()
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.panel_group = Some(group.into());
        self
    }

    pub fn with_default_panel(mut self, panel: impl Into<String>) -> Self {
        self.default_panel = Some(panel.into());
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Name for log messages, falling back to the marker value.
    pub fn identity(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        non_empty(&self.panel)
            .or_else(|| non_empty(&self.panel_group))
            .unwrap_or("<unnamed>")
    }

    /// `PANEL` takes precedence over `PANEL_GROUP`; an entry with
    /// neither has no kind.
    pub fn kind(&self) -> Option<EntryKind> {
        if non_empty(&self.panel).is_some() {
            Some(EntryKind::Panel)
        } else if non_empty(&self.panel_group).is_some() {
            Some(EntryKind::PanelGroup)
        } else {
            None
        }
    }

    /// Removal wins over addition.
    pub fn action(&self) -> PanelAction<'_> {
        if self.remove_panel {
            PanelAction::Remove
        } else if let Some(reference) = non_empty(&self.add_panel) {
            PanelAction::Add(reference)
        } else {
            PanelAction::None
        }
    }
}
