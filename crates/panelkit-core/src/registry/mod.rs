//! Registries for dashboards and panels.

mod base;
mod component_type;

pub use base::{ComponentRef, Registerable, Registry, RegistryScope, RegistrySnapshot};
pub use component_type::{ComponentType, DashboardType, PanelType, RegisterableType};
