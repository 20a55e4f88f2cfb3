//! Site assembly from configuration and the bundled applications.

use panelkit_config::Config;
use panelkit_core::{ModuleManifest, Site, SiteSettings, UserHome};

/// Module manifest of every bundled application.
pub(crate) fn build_manifest() -> ModuleManifest {
    let mut manifest = ModuleManifest::new();
    panelkit_app_project::install(&mut manifest);
    panelkit_app_admin::install(&mut manifest);
    manifest
}

/// Configuration used when no file is found: both bundled applications.
pub(crate) fn default_config() -> Config {
    let mut config = Config::default();
    config.site.installed_apps = vec![
        panelkit_app_project::PACKAGE.to_string(),
        panelkit_app_admin::PACKAGE.to_string(),
    ];
    config.site.dashboards = vec!["project".to_string(), "admin".to_string()];
    config
}

pub(crate) fn build_site(config: &Config) -> anyhow::Result<Site> {
    let site = &config.site;
    let settings = SiteSettings {
        name: site.name.clone(),
        slug: site.slug.clone(),
        namespace: site.namespace().to_string(),
        installed_apps: site.installed_apps.clone(),
        dashboards: site.dashboards.clone(),
        default_dashboard: site.default_dashboard.clone(),
        user_home: UserHome::from_setting(site.user_home()?),
        customization_module: site.customization_module.clone(),
        panel_customization: config.panel_customization.clone(),
    };

    Ok(Site::builder()
        .settings(settings)
        .manifest(build_manifest())
        .build()?)
}

#[cfg(test)]
mod tests {
    use panelkit_config::ConfigLoader;
    use panelkit_protocols::User;

    use super::*;

    #[test]
    fn test_default_config_site() {
        let site = build_site(&default_config()).unwrap();
        let compiled = site.routes().unwrap();

        assert_eq!(compiled.namespace(), "panelkit");
        let slugs: Vec<String> = site
            .get_dashboards()
            .unwrap()
            .iter()
            .map(|d| d.slug().to_string())
            .collect();
        assert_eq!(slugs, vec!["project", "admin"]);
        assert_eq!(site.absolute_url().unwrap(), "/project/");
    }

    #[test]
    fn test_configured_site() {
        let config = ConfigLoader::load_str(
            r#"
            [site]
            name = "Horizon"
            slug = "horizon"
            installed_apps = ["panelkit_app_project", "panelkit_app_admin"]
            default_dashboard = "admin"
            user_home = "panelkit_app_project.home.user_home"

            [[panel_customization]]
            name = "_10_network"
            PANEL_GROUP = "network"
            PANEL_GROUP_NAME = "Network"
            PANEL_GROUP_DASHBOARD = "project"

            [[panel_customization]]
            name = "_20_networks"
            PANEL = "networks"
            PANEL_DASHBOARD = "project"
            PANEL_GROUP = "network"
            ADD_PANEL = "panelkit_app_project.panels.NetworkPanel"

            [[panel_customization]]
            name = "_30_volumes"
            PANEL = "volumes"
            PANEL_DASHBOARD = "project"
            REMOVE_PANEL = true
            "#,
        )
        .unwrap();

        let site = build_site(&config).unwrap();
        let compiled = site.routes().unwrap();
        assert_eq!(
            compiled.reverse("horizon:project:networks:index").as_deref(),
            Some("/project/networks/")
        );
        assert_eq!(compiled.reverse("horizon:project:volumes:index"), None);
        assert_eq!(site.absolute_url().unwrap(), "/admin/");

        let member = User::authenticated("alice").with_permissions(["compute"]);
        assert_eq!(site.get_user_home(&member).unwrap(), "/project/instances/");
    }

    #[test]
    fn test_invalid_user_home() {
        let config = ConfigLoader::load_str("[site]\nuser_home = 1").unwrap();
        assert!(build_site(&config).is_err());
    }
}
