//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use panelkit_protocols::CustomizationEntry;

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// `~/.panelkit/panelkit.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".panelkit").join("panelkit.toml"))
    }

    /// Load configuration from a TOML file, then append the entries of the
    /// configured enabled directory.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        let mut config = Self::load_str(&content)?;

        if let Some(dir) = &config.site.enabled_dir {
            let dir = PathBuf::from(Self::expand_path(dir));
            let entries = Self::load_enabled_dir(&dir)?;
            config.panel_customization.extend(entries);
        }
        Ok(config)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Read one customization entry per `*.toml` file, in file name order.
    ///
    /// An entry without a `name` is named after its file stem. A missing
    /// directory yields no entries.
    pub fn load_enabled_dir(dir: &Path) -> Result<Vec<CustomizationEntry>, ConfigError> {
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "Enabled directory not found, skipping");
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            let content = Self::expand_env_vars(&fs::read_to_string(&path)?)?;
            let mut entry: CustomizationEntry =
                toml::from_str(&content).map_err(|source| ConfigError::InvalidEntry {
                    path: path.display().to_string(),
                    source,
                })?;
            if entry.name.is_empty() {
                if let Some(stem) = path.file_stem() {
                    entry.name = stem.to_string_lossy().into_owned();
                }
            }
            entries.push(entry);
        }
        debug!(dir = %dir.display(), entries = entries.len(), "Loaded enabled directory");
        Ok(entries)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|err| ConfigError::InvalidValue {
            field: "pattern".to_string(),
            message: err.to_string(),
        })?;

        let mut result = content.to_string();
        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }
        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.panelkit`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.site.slug, "panelkit");
    }

    #[test]
    fn test_load_site_config() {
        let content = r#"
            [site]
            name = "Horizon"
            slug = "horizon"
            installed_apps = ["panelkit_app_project", "panelkit_app_admin"]
            dashboards = ["project", "admin"]
            default_dashboard = "project"
            user_home = "/project/"

            [server]
            host = "0.0.0.0"
            port = 3000
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.site.name, "Horizon");
        assert_eq!(config.site.namespace(), "horizon");
        assert_eq!(config.site.installed_apps.len(), 2);
        assert_eq!(config.site.default_dashboard.as_deref(), Some("project"));
        assert_eq!(config.server.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[logging]").unwrap();
        writeln!(file, "level = \"debug\"").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/panelkit.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: test-only variable with a unique name
        unsafe {
            std::env::set_var("PANELKIT_TEST_DASHBOARD", "project");
        }
        let expanded = ConfigLoader::expand_env_vars("value = \"${PANELKIT_TEST_DASHBOARD}\"").unwrap();
        assert_eq!(expanded, "value = \"project\"");
        unsafe {
            std::env::remove_var("PANELKIT_TEST_DASHBOARD");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let result = ConfigLoader::expand_env_vars("value = \"${PANELKIT_UNSET_TEST_VAR_9731}\"");
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(var)) if var == "PANELKIT_UNSET_TEST_VAR_9731"));
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(ConfigLoader::expand_path("/etc/panelkit"), "/etc/panelkit");
        let expanded = ConfigLoader::expand_path("~/enabled");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/enabled"));
    }

    #[test]
    fn test_enabled_dir_in_file_name_order() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("_20_instances.toml"),
            "PANEL = \"instances\"\nPANEL_DASHBOARD = \"project\"\nPANEL_GROUP = \"net\"\nADD_PANEL = \"app.panels.Instances\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("_10_net.toml"),
            "name = \"network group\"\nPANEL_GROUP = \"net\"\nPANEL_GROUP_NAME = \"Network\"\nPANEL_GROUP_DASHBOARD = \"project\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("README.md"), "not an entry").unwrap();

        let entries = ConfigLoader::load_enabled_dir(dir.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "network group");
        assert_eq!(entries[1].name, "_20_instances");
        assert_eq!(entries[1].add_panel.as_deref(), Some("app.panels.Instances"));
    }

    #[test]
    fn test_enabled_dir_missing() {
        let entries = ConfigLoader::load_enabled_dir(Path::new("/nonexistent/enabled")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_enabled_dir_invalid_entry() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_10_bad.toml"), "REMOVE_PANEL = \"yes\"").unwrap();

        let err = ConfigLoader::load_enabled_dir(dir.path()).unwrap_err();
        assert!(matches!(&err, ConfigError::InvalidEntry { path, .. } if path.ends_with("_10_bad.toml")));
    }

    #[test]
    fn test_load_appends_enabled_entries() {
        let enabled = TempDir::new().unwrap();
        fs::write(
            enabled.path().join("_50_remove.toml"),
            "PANEL = \"volumes\"\nPANEL_DASHBOARD = \"project\"\nREMOVE_PANEL = true\n",
        )
        .unwrap();

        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [site]
            enabled_dir = "{}"

            [[panel_customization]]
            name = "_10_net"
            PANEL_GROUP = "net"
            PANEL_GROUP_NAME = "Network"
            PANEL_GROUP_DASHBOARD = "project"
            "#,
            enabled.path().display()
        )
        .unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        let names: Vec<&str> = config
            .panel_customization
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(names, vec!["_10_net", "_50_remove"]);
    }
}
