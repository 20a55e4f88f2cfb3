//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_site(config, &mut result);
        Self::validate_server(config, &mut result);
        Self::validate_customization(config, &mut result);

        Ok(result)
    }

    fn validate_site(config: &Config, result: &mut ValidationResult) {
        let site = &config.site;
        if site.slug.trim().is_empty() {
            result.add_error(ValidationError::new("site.slug", "Every Site must have a slug."));
        }

        if let Err(err) = site.user_home() {
            result.add_error(ValidationError::new("site.user_home", err.to_string()));
        }

        if let Some(module) = &site.customization_module {
            if !module.contains('.') {
                result.add_error(ValidationError::new(
                    "site.customization_module",
                    format!("'{module}' must be a dotted module path"),
                ));
            }
        }

        if let Some(default) = &site.default_dashboard {
            if !site.dashboards.is_empty() && !site.dashboards.contains(default) {
                result.add_warning(ValidationWarning::new(
                    "site.default_dashboard",
                    format!("Default dashboard '{default}' is not listed in site.dashboards"),
                ));
            }
        }
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_customization(config: &Config, result: &mut ValidationResult) {
        for (index, entry) in config.panel_customization.iter().enumerate() {
            let path = if entry.name.is_empty() {
                format!("panel_customization[{index}]")
            } else {
                format!("panel_customization.{}", entry.name)
            };

            if entry.kind().is_none() {
                result.add_error(ValidationError::new(
                    path.clone(),
                    "Entry doesn't have PANEL or PANEL_GROUP defined",
                ));
                continue;
            }

            if entry.remove_panel && entry.add_panel.is_some() {
                result.add_warning(ValidationWarning::new(
                    path.clone(),
                    "Entry sets both REMOVE_PANEL and ADD_PANEL; the panel will be removed",
                ));
            }

            if entry.panel.is_some() && entry.panel_dashboard.is_none() {
                result.add_warning(ValidationWarning::new(
                    path,
                    "Entry doesn't have PANEL_DASHBOARD defined and will be skipped",
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
