//! # Panelkit Core
//!
//! Registry, discovery and route compilation engine.
//!
//! ## Components
//!
//! - [`Site`] - Registry of dashboards; discovery, customization and the
//!   compiled route table
//! - [`DashboardEntry`] - A registered dashboard with its panel registry
//! - [`Registry`] - Insertion-ordered, one-instance-per-type container
//! - [`ModuleManifest`] - Named module initializers scanned by discovery
//!
//! ## Lifecycle
//!
//! Discovery registers dashboards, then each dashboard discovers its
//! panels. The customization layer edits the result, and the route table
//! is compiled once behind [`LazyRoutes`].

mod customization;
pub mod dashboard;
mod discovery;
pub mod global;
pub mod home;
pub mod lazy;
pub mod manifest;
pub mod navigation;
pub mod panel_group;
pub mod registry;
pub mod site;
pub mod templates;

#[cfg(test)]
pub(crate) mod testing;

pub use dashboard::{DashboardEntry, DashboardState};
pub use home::UserHome;
pub use lazy::{CompiledRoutes, LazyRoutes};
pub use manifest::{ModuleInit, ModuleManifest, UserCallable};
pub use navigation::{NavDashboard, NavGroup, NavPanel};
pub use panel_group::{PanelGroup, DEFAULT_PANEL_GROUP, OTHER_PANEL_GROUP};
pub use registry::{
    ComponentRef, ComponentType, DashboardType, PanelType, RegisterableType, Registerable,
    Registry, RegistryScope,
};
pub use site::{Site, SiteBuilder, SiteSettings};
pub use templates::TemplateDirectories;

pub use panelkit_protocols::AccessCache;
