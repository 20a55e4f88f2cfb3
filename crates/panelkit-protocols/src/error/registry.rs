//! Registry, discovery and compilation errors.

use thiserror::Error;

/// Errors raised while registering components or compiling routes.
///
/// All of these surface at startup. None of them is expected once the
/// route table has been built.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registration target is not of the kind the registry accepts.
    #[error("Invalid component: {0}")]
    InvalidComponent(String),

    /// Lookup or unregistration of something that is not registered.
    #[error("{0}")]
    NotRegistered(String),

    /// Missing slug, missing attribute or malformed configuration.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    /// A namespaced route name could not be resolved to a path.
    #[error("Reverse for '{0}' not found")]
    NoReverseMatch(String),

    /// No module or package with this path exists in the manifest.
    #[error("No module named '{0}'")]
    ModuleNotFound(String),

    /// A module exists but running its registration failed.
    #[error("Module '{module}' failed to load: {source}")]
    ModuleFailed {
        module: String,
        #[source]
        source: Box<RegistryError>,
    },

    #[error("{0}")]
    Custom(String),
}

impl RegistryError {
    /// Whether this is a `NotRegistered` error.
    pub fn is_not_registered(&self) -> bool {
        matches!(self, RegistryError::NotRegistered(_))
    }

    /// The innermost error, unwrapping module failures.
    pub fn root_cause(&self) -> &RegistryError {
        match self {
            RegistryError::ModuleFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
