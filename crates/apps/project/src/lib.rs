//! # Project Application
//!
//! The `project` dashboard with a `compute` group of panels.
//!
//! ## Modules
//!
//! - `panelkit_app_project.dashboard`: registers [`ProjectDashboard`]
//! - `panelkit_app_project.<panel>.panel`: registers each declared panel
//! - `panelkit_app_project.panels.NetworkPanel`: component for `ADD_PANEL`
//! - `panelkit_app_project.home.user_home`: user home callable

pub mod dashboard;
pub mod panels;

use panelkit_core::{ComponentRef, ModuleManifest, PanelType, Site};
use panelkit_protocols::{RegistryError, User};

pub use dashboard::ProjectDashboard;
pub use panels::{InstancesPanel, NetworkPanel, OverviewPanel, VolumesPanel};

/// Package name used in installed apps and module paths.
pub const PACKAGE: &str = "panelkit_app_project";

fn register_panel(site: &Site, panel: PanelType) -> Result<(), RegistryError> {
    site.register_panel(ComponentRef::of::<ProjectDashboard>(), panel)
        .map(|_| ())
}

/// Add this application's modules to `manifest`.
pub fn install(manifest: &mut ModuleManifest) {
    manifest
        .module("panelkit_app_project.dashboard", |site| {
            site.register::<ProjectDashboard>().map(|_| ())
        })
        .module("panelkit_app_project.overview.panel", |site| {
            register_panel(site, PanelType::of::<OverviewPanel>())
        })
        .module("panelkit_app_project.instances.panel", |site| {
            register_panel(site, PanelType::of::<InstancesPanel>())
        })
        .module("panelkit_app_project.volumes.panel", |site| {
            register_panel(site, PanelType::of::<VolumesPanel>())
        })
        .panel::<NetworkPanel>("panelkit_app_project.panels.NetworkPanel")
        .callable("panelkit_app_project.home.user_home", user_home);
}

/// Members land on the instances list, everyone else on the overview.
fn user_home(user: &User) -> String {
    if user.permissions.contains("compute") {
        "/project/instances/".to_string()
    } else {
        "/project/".to_string()
    }
}
