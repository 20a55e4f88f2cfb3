//! Configuration errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("Invalid customization file {path}: {source}")]
    InvalidEntry {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = ConfigError::NotFound("panelkit.toml".to_string());
        assert!(err.to_string().contains("panelkit.toml"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::InvalidValue {
            field: "site.user_home".to_string(),
            message: "must be a string".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("site.user_home"));
        assert!(display.contains("must be a string"));
    }

    #[test]
    fn test_env_var_not_set_error() {
        let err = ConfigError::EnvVarNotSet("PANELKIT_PORT".to_string());
        assert!(err.to_string().contains("PANELKIT_PORT"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::from(io_err);
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_invalid_entry_names_file() {
        let source = toml::from_str::<toml::Table>("PANEL = [").unwrap_err();
        let err = ConfigError::InvalidEntry {
            path: "_10_net.toml".to_string(),
            source,
        };
        assert!(err.to_string().contains("_10_net.toml"));
    }
}
