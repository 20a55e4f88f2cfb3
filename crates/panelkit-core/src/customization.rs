//! Customization layer applied after discovery.
//!
//! Panel group entries are all applied before any panel entry: a panel
//! entry may target a group created in the same pass, and creating a group
//! re-runs its dashboard's discovery. Each entry is applied in isolation;
//! a failing entry is logged and skipped.

use tracing::{debug, warn};

use panelkit_protocols::{
    CustomizationEntry, EntryKind, PanelAction, PanelEntry, PanelGroupSpec, RegistryError,
};

use crate::registry::ComponentRef;
use crate::site::Site;

impl Site {
    /// Apply the configured customization entries.
    pub fn apply_customizations(&self) {
        self.apply_entries(&self.settings().panel_customization);
    }

    /// Apply `entries` in order, group entries first.
    pub fn apply_entries(&self, entries: &[CustomizationEntry]) {
        let mut panel_entries = Vec::new();
        for entry in entries {
            match entry.kind() {
                Some(EntryKind::Panel) => panel_entries.push(entry),
                Some(EntryKind::PanelGroup) => self.apply_panel_group_entry(entry),
                None => warn!(
                    entry = entry.identity(),
                    "Skipping entry because it doesn't have PANEL or PANEL_GROUP defined"
                ),
            }
        }
        for entry in panel_entries {
            self.apply_panel_entry(entry);
        }
    }

    /// Create a panel group and re-run its dashboard's discovery.
    pub fn apply_panel_group_entry(&self, entry: &CustomizationEntry) {
        if let Err(err) = self.process_panel_group_entry(entry) {
            warn!(
                entry = entry.identity(),
                error = %err,
                "Could not process panel group"
            );
        }
    }

    /// Remove or add a panel, and reassign the default panel.
    pub fn apply_panel_entry(&self, entry: &CustomizationEntry) {
        if let Err(err) = self.process_panel_entry(entry) {
            warn!(
                entry = entry.identity(),
                error = %err,
                "Could not process panel"
            );
        }
    }

    fn process_panel_group_entry(&self, entry: &CustomizationEntry) -> Result<(), RegistryError> {
        let slug = entry.panel_group.clone().unwrap_or_default();
        let Some(dashboard) = entry.panel_group_dashboard.as_deref() else {
            warn!(
                entry = entry.identity(),
                "Skipping entry because it doesn't have PANEL_GROUP_DASHBOARD defined"
            );
            return Ok(());
        };
        let dashboard = self.get_dashboard(dashboard)?;

        let Some(name) = entry.panel_group_name.as_deref().filter(|n| !n.is_empty()) else {
            warn!(
                entry = entry.identity(),
                "Skipping entry because it doesn't have PANEL_GROUP_NAME defined"
            );
            return Ok(());
        };

        dashboard.declare(PanelEntry::Group(PanelGroupSpec::new(slug).with_name(name)));
        dashboard.reset_discovery();
        dashboard.autodiscover(self)
    }

    fn process_panel_entry(&self, entry: &CustomizationEntry) -> Result<(), RegistryError> {
        let panel_slug = entry.panel.as_deref().unwrap_or_default();
        let Some(dashboard) = entry.panel_dashboard.as_deref() else {
            warn!(
                entry = entry.identity(),
                "Skipping entry because it doesn't have PANEL_DASHBOARD defined"
            );
            return Ok(());
        };
        let dashboard = self.get_dashboard(dashboard)?;

        if let Some(default_panel) = entry.default_panel.as_deref().filter(|p| !p.is_empty()) {
            dashboard.set_default_panel(default_panel);
        }

        match entry.action() {
            PanelAction::Remove => {
                let registered = dashboard
                    .get_panels()
                    .iter()
                    .any(|panel| panel.slug() == panel_slug);
                if registered {
                    dashboard.unregister(ComponentRef::Slug(panel_slug))?;
                }
            }
            PanelAction::Add(reference) => {
                let component = match self.manifest().resolve_component(reference) {
                    Err(RegistryError::ModuleNotFound(module)) => {
                        warn!(module = %module, "Could not load panel");
                        return Ok(());
                    }
                    other => other?,
                };
                let panel_type = component.expect_panel()?;
                if !panel_type.can_register() {
                    debug!(panel = panel_slug, "Load condition failed for panel");
                    return Ok(());
                }

                let panel = dashboard.register(panel_type)?;
                match entry.panel_group.as_deref().filter(|g| !g.is_empty()) {
                    Some(group) => dashboard.add_to_group(group, panel.slug())?,
                    None => {
                        dashboard.declare(PanelEntry::Panel(panel.slug().to_string()));
                    }
                }
            }
            PanelAction::None => {}
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "customization_tests.rs"]
mod tests;
