//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

use panelkit_protocols::CustomizationEntry;

use crate::error::ConfigError;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Inline customization entries, applied before the enabled directory.
    #[serde(default)]
    pub panel_customization: Vec<CustomizationEntry>,
}

/// Site configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_name")]
    pub name: String,

    #[serde(default = "default_site_slug")]
    pub slug: String,

    /// Route namespace; defaults to the slug.
    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub installed_apps: Vec<String>,

    /// Dashboard display order.
    #[serde(default)]
    pub dashboards: Vec<String>,

    #[serde(default)]
    pub default_dashboard: Option<String>,

    /// A URL or a dotted callable reference. Kept untyped so that a
    /// non-string value is reported by the validator.
    #[serde(default)]
    pub user_home: Option<toml::Value>,

    #[serde(default)]
    pub customization_module: Option<String>,

    /// Directory of per-entry customization files.
    #[serde(default)]
    pub enabled_dir: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            slug: default_site_slug(),
            namespace: None,
            installed_apps: Vec::new(),
            dashboards: Vec::new(),
            default_dashboard: None,
            user_home: None,
            customization_module: None,
            enabled_dir: None,
        }
    }
}

impl SiteConfig {
    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(&self.slug)
    }

    /// The `user_home` setting as a string.
    pub fn user_home(&self) -> Result<Option<&str>, ConfigError> {
        match &self.user_home {
            None => Ok(None),
            Some(toml::Value::String(value)) => Ok(Some(value)),
            Some(other) => Err(ConfigError::InvalidValue {
                field: "site.user_home".to_string(),
                message: format!("expected a string, found {}", other.type_str()),
            }),
        }
    }
}

fn default_site_name() -> String {
    "Panelkit".to_string()
}

fn default_site_slug() -> String {
    "panelkit".to_string()
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_level")]
    pub level: String,

    /// Also write a daily rolling log file.
    #[serde(default)]
    pub file: bool,

    /// Log directory; defaults to `~/.panelkit/logs`.
    #[serde(default)]
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: false,
            dir: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.site.slug, "panelkit");
        assert_eq!(config.site.namespace(), "panelkit");
        assert_eq!(config.server.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.file);
        assert!(config.panel_customization.is_empty());
    }

    #[test]
    fn test_namespace_override() {
        let site = SiteConfig {
            namespace: Some("dash".to_string()),
            ..Default::default()
        };
        assert_eq!(site.namespace(), "dash");
    }

    #[test]
    fn test_user_home_string() {
        let site: SiteConfig = toml::from_str(r#"user_home = "/project/""#).unwrap();
        assert_eq!(site.user_home().unwrap(), Some("/project/"));
    }

    #[test]
    fn test_user_home_wrong_type() {
        let site: SiteConfig = toml::from_str("user_home = 3").unwrap();
        let err = site.user_home().unwrap_err();
        assert!(err.to_string().contains("site.user_home"));
        assert!(err.to_string().contains("integer"));
    }

    #[test]
    fn test_customization_entries_parse() {
        let config: Config = toml::from_str(
            r#"
            [[panel_customization]]
            name = "_10_net"
            PANEL_GROUP = "net"
            PANEL_GROUP_NAME = "Network"
            PANEL_GROUP_DASHBOARD = "project"

            [[panel_customization]]
            PANEL = "instances"
            PANEL_DASHBOARD = "project"
            REMOVE_PANEL = true
            "#,
        )
        .unwrap();

        assert_eq!(config.panel_customization.len(), 2);
        assert_eq!(config.panel_customization[0].panel_group.as_deref(), Some("net"));
        assert!(config.panel_customization[1].remove_panel);
    }
}
