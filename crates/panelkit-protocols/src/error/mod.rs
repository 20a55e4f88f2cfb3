//! Error types for the panelkit protocol layer.

mod access;
mod registry;

pub use access::*;
pub use registry::*;
