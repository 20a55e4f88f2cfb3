//! # Panelkit Config
//!
//! TOML configuration for a panelkit site: site settings, the HTTP server,
//! logging, and the panel customization entries.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
