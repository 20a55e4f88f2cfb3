//! Shared fixtures for unit tests.

use std::path::PathBuf;

use serde_json::json;

use panelkit_protocols::{
    ComponentMeta, Dashboard, Nav, Panel, PanelEntry, RegistryError, RouteTable, ViewResponse,
};

use crate::manifest::ModuleManifest;
use crate::registry::{ComponentRef, PanelType};
use crate::site::Site;

/// A table with a single `index` view at the mount point.
pub(crate) fn index_routes(label: &'static str) -> RouteTable {
    RouteTable::new().view("", "index", move |req| {
        ViewResponse::ok(json!({
            "view": label,
            "dashboard": req.dashboard,
            "panel": req.panel,
        }))
    })
}

macro_rules! test_panel {
    ($ty:ident, $slug:expr, $name:expr) => {
        test_panel!($ty, $slug, $name, |meta| meta);
    };
    ($ty:ident, $slug:expr, $name:expr, $configure:expr) => {
        pub(crate) struct $ty {
            meta: ComponentMeta,
        }

        impl Default for $ty {
            fn default() -> Self {
                let configure: fn(ComponentMeta) -> ComponentMeta = $configure;
                Self {
                    meta: configure(ComponentMeta::new($slug, $name)),
                }
            }
        }

        impl Panel for $ty {
            fn meta(&self) -> &ComponentMeta {
                &self.meta
            }

            fn routes(&self) -> RouteTable {
                index_routes($slug)
            }
        }
    };
}

test_panel!(Overview, "overview", "Overview");
test_panel!(Volumes, "volumes", "Volumes");
test_panel!(Network, "networks", "Networks");
test_panel!(Nested, "identity.users", "Users");
test_panel!(Hidden, "hidden", "Hidden", |meta| meta.with_nav(Nav::Hide));
test_panel!(Restricted, "restricted", "Restricted", |meta| meta
    .with_policy_rules(["restricted:get"]));
test_panel!(Blank, "", "Blank");

pub(crate) struct Instances {
    meta: ComponentMeta,
}

impl Default for Instances {
    fn default() -> Self {
        Self {
            meta: ComponentMeta::new("instances", "Instances").with_permissions(["compute"]),
        }
    }
}

impl Panel for Instances {
    fn meta(&self) -> &ComponentMeta {
        &self.meta
    }

    fn routes(&self) -> RouteTable {
        index_routes("instances").view("{instance_id}/", "detail", |req| {
            ViewResponse::ok(json!({
                "view": "instances.detail",
                "instance_id": req.param("instance_id"),
            }))
        })
    }
}

/// Refuses registration through the customization layer.
pub(crate) struct Gated {
    meta: ComponentMeta,
}

impl Default for Gated {
    fn default() -> Self {
        Self {
            meta: ComponentMeta::new("gated", "Gated"),
        }
    }
}

impl Panel for Gated {
    fn meta(&self) -> &ComponentMeta {
        &self.meta
    }

    fn routes(&self) -> RouteTable {
        index_routes("gated")
    }

    fn can_register() -> bool {
        false
    }
}

/// Publishes the system temp directory as its template directory.
pub(crate) struct Templated {
    meta: ComponentMeta,
}

impl Default for Templated {
    fn default() -> Self {
        Self {
            meta: ComponentMeta::new("templated", "Templated"),
        }
    }
}

impl Panel for Templated {
    fn meta(&self) -> &ComponentMeta {
        &self.meta
    }

    fn routes(&self) -> RouteTable {
        index_routes("templated")
    }

    fn template_dir(&self) -> Option<PathBuf> {
        Some(std::env::temp_dir())
    }
}

pub(crate) struct Project {
    meta: ComponentMeta,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            meta: ComponentMeta::new("project", "Project").with_permissions(["project"]),
        }
    }
}

impl Dashboard for Project {
    fn meta(&self) -> &ComponentMeta {
        &self.meta
    }

    fn package(&self) -> &str {
        "app"
    }

    fn panels(&self) -> Vec<PanelEntry> {
        vec!["overview".into(), "instances".into()]
    }

    fn default_panel(&self) -> Option<&str> {
        Some("overview")
    }
}

pub(crate) struct Admin {
    meta: ComponentMeta,
}

impl Default for Admin {
    fn default() -> Self {
        Self {
            meta: ComponentMeta::new("admin", "Admin")
                .with_permissions(["admin"])
                .with_policy_rules(["admin:view"]),
        }
    }
}

impl Dashboard for Admin {
    fn meta(&self) -> &ComponentMeta {
        &self.meta
    }

    fn package(&self) -> &str {
        "admin_app"
    }

    fn panels(&self) -> Vec<PanelEntry> {
        vec!["overview".into()]
    }

    fn default_panel(&self) -> Option<&str> {
        Some("overview")
    }
}

pub(crate) struct Public {
    meta: ComponentMeta,
}

impl Default for Public {
    fn default() -> Self {
        Self {
            meta: ComponentMeta::new("public", "Public"),
        }
    }
}

impl Dashboard for Public {
    fn meta(&self) -> &ComponentMeta {
        &self.meta
    }

    fn package(&self) -> &str {
        "public_app"
    }

    fn panels(&self) -> Vec<PanelEntry> {
        vec!["overview".into()]
    }

    fn default_panel(&self) -> Option<&str> {
        Some("overview")
    }

    fn public(&self) -> bool {
        true
    }
}

fn register_on<D: 'static>(site: &Site, panel: PanelType) -> Result<(), RegistryError> {
    site.register_panel(ComponentRef::of::<D>(), panel).map(|_| ())
}

/// Modules of the `app` package: the project dashboard and its panels.
pub(crate) fn project_manifest() -> ModuleManifest {
    let mut manifest = ModuleManifest::new();
    manifest
        .module("app.dashboard", |site| site.register::<Project>().map(|_| ()))
        .module("app.overview.panel", |site| {
            register_on::<Project>(site, PanelType::of::<Overview>())
        })
        .module("app.instances.panel", |site| {
            register_on::<Project>(site, PanelType::of::<Instances>())
        })
        .panel::<Instances>("app.panels.Instances")
        .panel::<Volumes>("app.panels.Volumes")
        .panel::<Network>("app.panels.Network")
        .panel::<Gated>("app.panels.Gated")
        .panel::<Templated>("app.panels.Templated")
        .dashboard::<Admin>("app.panels.Admin")
        .callable("app.home.user_home", |user| format!("/users/{}/", user.id));
    manifest
}

/// Modules of the `admin_app` package.
pub(crate) fn admin_manifest() -> ModuleManifest {
    let mut manifest = ModuleManifest::new();
    manifest
        .module("admin_app.dashboard", |site| site.register::<Admin>().map(|_| ()))
        .module("admin_app.overview.panel", |site| {
            register_on::<Admin>(site, PanelType::of::<Overview>())
        });
    manifest
}

/// A site named `horizon` with the `app` package installed.
pub(crate) fn project_site() -> Site {
    Site::builder()
        .name("Horizon")
        .slug("horizon")
        .installed_app("app")
        .manifest(project_manifest())
        .build()
        .unwrap()
}
