//! # Admin Application
//!
//! The `admin` dashboard. Its `defaults` panel is discovered from the
//! dashboard's package; `hypervisors` is registered by the app-level
//! `panelkit_app_admin.panel` module.

mod dashboard;
mod panels;

use panelkit_core::{ComponentRef, ModuleManifest, PanelType};

pub use dashboard::AdminDashboard;
pub use panels::{DefaultsPanel, HypervisorsPanel};

pub const PACKAGE: &str = "panelkit_app_admin";

/// Add this application's modules to `manifest`.
pub fn install(manifest: &mut ModuleManifest) {
    manifest
        .module("panelkit_app_admin.dashboard", |site| {
            site.register::<AdminDashboard>().map(|_| ())
        })
        .module("panelkit_app_admin.panel", |site| {
            site.register_panel(
                ComponentRef::of::<AdminDashboard>(),
                PanelType::of::<HypervisorsPanel>(),
            )
            .map(|_| ())
        })
        .module("panelkit_app_admin.defaults.panel", |site| {
            site.register_panel(
                ComponentRef::of::<AdminDashboard>(),
                PanelType::of::<DefaultsPanel>(),
            )
            .map(|_| ())
        });
}
