//! Panels of the project dashboard.

mod instances;
mod network;
mod overview;
mod volumes;

pub use instances::InstancesPanel;
pub use network::{NetworkPanel, DISABLE_NETWORK_ENV};
pub use overview::OverviewPanel;
pub use volumes::VolumesPanel;
