//! The site: registry of dashboards and owner of the compiled route table.

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::{debug, error, info};

use panelkit_protocols::{
    AccessCache, AccessContext, ComponentMeta, CustomizationEntry, Dashboard, Panel,
    PolicyEvaluator, RegistryError, Route, RouteTable, User,
};

use crate::dashboard::DashboardEntry;
use crate::discovery::attempt_import;
use crate::home::UserHome;
use crate::lazy::{CompiledRoutes, LazyRoutes};
use crate::manifest::ModuleManifest;
use crate::registry::{
    ComponentRef, DashboardType, PanelType, RegisterableType, Registry, RegistryScope,
};
use crate::templates::TemplateDirectories;

/// Discovery conventions, in the order they are scanned.
const DISCOVERY_MODULES: [&str; 2] = ["dashboard", "panel"];

/// Site-level settings.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub name: String,
    pub slug: String,
    /// Namespace of the compiled route table.
    pub namespace: String,
    /// Host applications scanned during discovery, in order.
    pub installed_apps: Vec<String>,
    /// Explicit dashboard order; unlisted dashboards follow, sorted.
    pub dashboards: Vec<String>,
    pub default_dashboard: Option<String>,
    pub user_home: UserHome,
    /// Module imported after customization, e.g. `overrides.customize`.
    pub customization_module: Option<String>,
    pub panel_customization: Vec<CustomizationEntry>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            name: "Panelkit".to_string(),
            slug: "panelkit".to_string(),
            namespace: "panelkit".to_string(),
            installed_apps: Vec::new(),
            dashboards: Vec::new(),
            default_dashboard: None,
            user_home: UserHome::Default,
            customization_module: None,
            panel_customization: Vec::new(),
        }
    }
}

/// Builder for [`Site`].
#[derive(Default)]
pub struct SiteBuilder {
    settings: SiteSettings,
    manifest: ModuleManifest,
    policy: Option<Arc<dyn PolicyEvaluator>>,
    routes: RouteTable,
}

impl SiteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(mut self, settings: SiteSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.settings.name = name.into();
        self
    }

    /// Set the slug. The namespace follows unless set separately.
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        if self.settings.namespace == self.settings.slug {
            self.settings.namespace = slug.clone();
        }
        self.settings.slug = slug;
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.settings.namespace = namespace.into();
        self
    }

    pub fn installed_app(mut self, app: impl Into<String>) -> Self {
        self.settings.installed_apps.push(app.into());
        self
    }

    pub fn dashboards<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.dashboards = order.into_iter().map(Into::into).collect();
        self
    }

    pub fn default_dashboard(mut self, slug: impl Into<String>) -> Self {
        self.settings.default_dashboard = Some(slug.into());
        self
    }

    pub fn user_home(mut self, home: UserHome) -> Self {
        self.settings.user_home = home;
        self
    }

    pub fn customization_module(mut self, module: impl Into<String>) -> Self {
        self.settings.customization_module = Some(module.into());
        self
    }

    pub fn customization(mut self, entry: CustomizationEntry) -> Self {
        self.settings.panel_customization.push(entry);
        self
    }

    pub fn manifest(mut self, manifest: ModuleManifest) -> Self {
        self.manifest.merge(manifest);
        self
    }

    pub fn policy(mut self, policy: Arc<dyn PolicyEvaluator>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Site-level views mounted ahead of the dashboards.
    pub fn routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    pub fn build(self) -> Result<Site, RegistryError> {
        let meta = ComponentMeta::new(self.settings.slug.clone(), self.settings.name.clone());
        meta.validate("Site")?;
        Ok(Site {
            meta,
            settings: self.settings,
            manifest: self.manifest,
            policy: self.policy,
            own_routes: self.routes,
            dashboards: Registry::new("Dashboard"),
            templates: Arc::new(TemplateDirectories::new()),
            loaded_modules: Mutex::new(HashSet::new()),
            routes: OnceCell::new(),
        })
    }
}

pub struct Site {
    meta: ComponentMeta,
    settings: SiteSettings,
    manifest: ModuleManifest,
    policy: Option<Arc<dyn PolicyEvaluator>>,
    own_routes: RouteTable,
    dashboards: Registry<DashboardEntry>,
    templates: Arc<TemplateDirectories>,
    loaded_modules: Mutex<HashSet<String>>,
    routes: OnceCell<Arc<CompiledRoutes>>,
}

impl Site {
    pub fn builder() -> SiteBuilder {
        SiteBuilder::new()
    }

    pub fn slug(&self) -> &str {
        &self.meta.slug
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn namespace(&self) -> &str {
        &self.settings.namespace
    }

    pub fn settings(&self) -> &SiteSettings {
        &self.settings
    }

    pub fn manifest(&self) -> &ModuleManifest {
        &self.manifest
    }

    pub fn templates(&self) -> &TemplateDirectories {
        &self.templates
    }

    /// Access context for `user`, evaluated with the site's policy.
    pub fn access_context(&self, user: Option<User>) -> AccessContext {
        let ctx = AccessContext::new(user);
        match &self.policy {
            Some(policy) => ctx.with_policy(policy.clone()),
            None => ctx,
        }
    }

    /// Access context that memoizes results in `cache`.
    pub fn cached_access_context(&self, user: Option<User>, cache: Arc<AccessCache>) -> AccessContext {
        self.access_context(user).with_cache(cache)
    }

    // Registration

    pub fn register<D: Dashboard + Default>(&self) -> Result<Arc<DashboardEntry>, RegistryError> {
        self.register_dashboard(DashboardType::of::<D>())
    }

    /// Register a dashboard. Repeat registration returns the existing entry.
    pub fn register_dashboard(
        &self,
        dashboard: DashboardType,
    ) -> Result<Arc<DashboardEntry>, RegistryError> {
        self.dashboards.register_with(dashboard.id(), || {
            let definition = dashboard.construct();
            definition.meta().validate("Dashboard")?;
            let scope =
                RegistryScope::new("Dashboard", definition.slug()).within("Site", self.slug());
            debug!(dashboard = definition.slug(), "Registering dashboard");
            Ok(Arc::new(DashboardEntry::new(
                definition,
                scope,
                self.templates.clone(),
            )))
        })
    }

    /// Register a resolved component, which must be a dashboard.
    pub fn register_component(
        &self,
        component: RegisterableType,
    ) -> Result<Arc<DashboardEntry>, RegistryError> {
        self.register_dashboard(component.expect_dashboard()?)
    }

    pub fn unregister_dashboard<'a>(
        &self,
        dashboard: impl Into<ComponentRef<'a>>,
    ) -> Result<bool, RegistryError> {
        let removed = self.dashboards.remove(dashboard.into())?;
        for slug in removed.panel_registry().slugs() {
            self.templates.remove(removed.slug(), &slug);
        }
        Ok(true)
    }

    pub fn get_dashboard<'a>(
        &self,
        dashboard: impl Into<ComponentRef<'a>>,
    ) -> Result<Arc<DashboardEntry>, RegistryError> {
        self.dashboards.lookup(dashboard.into())
    }

    /// Register a panel on an already registered dashboard.
    pub fn register_panel<'a>(
        &self,
        dashboard: impl Into<ComponentRef<'a>>,
        panel: PanelType,
    ) -> Result<Arc<dyn Panel>, RegistryError> {
        self.get_dashboard(dashboard)?.register(panel)
    }

    pub fn unregister_panel<'a, 'b>(
        &self,
        dashboard: impl Into<ComponentRef<'a>>,
        panel: impl Into<ComponentRef<'b>>,
    ) -> Result<bool, RegistryError> {
        self.get_dashboard(dashboard)?.unregister(panel.into())
    }

    /// Registered dashboards in registration order.
    pub fn registered_dashboards(&self) -> Vec<Arc<DashboardEntry>> {
        self.dashboards.values()
    }

    /// Dashboards in display order: the configured order first, then the
    /// remaining ones sorted by slug.
    pub fn get_dashboards(&self) -> Result<Vec<Arc<DashboardEntry>>, RegistryError> {
        let mut ordered: Vec<Arc<DashboardEntry>> = Vec::new();
        for slug in &self.settings.dashboards {
            let dashboard = self.dashboards.lookup(ComponentRef::Slug(slug))?;
            if !ordered.iter().any(|d| Arc::ptr_eq(d, &dashboard)) {
                ordered.push(dashboard);
            }
        }

        let mut extra: Vec<Arc<DashboardEntry>> = self
            .dashboards
            .values()
            .into_iter()
            .filter(|d| !ordered.iter().any(|o| Arc::ptr_eq(o, d)))
            .collect();
        extra.sort_by(|a, b| a.slug().cmp(b.slug()));
        ordered.extend(extra);
        Ok(ordered)
    }

    /// The configured default dashboard, else the first in display order.
    ///
    /// Compiles the route table first so discovery has run.
    pub fn get_default_dashboard(&self) -> Result<Arc<DashboardEntry>, RegistryError> {
        self.routes()?;
        if let Some(slug) = &self.settings.default_dashboard {
            return self.dashboards.lookup(ComponentRef::Slug(slug));
        }
        self.get_dashboards()?.into_iter().next().ok_or_else(|| {
            RegistryError::NotRegistered("No dashboard modules have been registered.".to_string())
        })
    }

    // Discovery

    /// Run the initializer of a manifest module.
    ///
    /// A module that loaded successfully is not run again. Importing a
    /// package without an initializer does nothing.
    pub fn import_module(&self, path: &str) -> Result<(), RegistryError> {
        if self.loaded_modules.lock().contains(path) {
            return Ok(());
        }
        match self.manifest.init(path) {
            Some(init) => {
                debug!(module = path, "Importing module");
                init(self).map_err(|source| RegistryError::ModuleFailed {
                    module: path.to_string(),
                    source: Box::new(source),
                })?;
                self.loaded_modules.lock().insert(path.to_string());
                Ok(())
            }
            None if self.manifest.is_package(path) => Ok(()),
            None => Err(RegistryError::ModuleNotFound(path.to_string())),
        }
    }

    pub fn is_loaded(&self, module: &str) -> bool {
        self.loaded_modules.lock().contains(module)
    }

    /// Scan `dashboard` then `panel` modules of every installed app.
    pub fn autodiscover(&self) -> Result<(), RegistryError> {
        for convention in DISCOVERY_MODULES {
            for app in &self.settings.installed_apps {
                self.import_module(app)?;
                let module = format!("{app}.{convention}");
                attempt_import(self, &self.dashboards, &module, app, convention)?;
            }
        }
        info!(
            site = self.slug(),
            dashboards = self.dashboards.len(),
            "Site discovery complete"
        );
        Ok(())
    }

    fn import_customization_module(&self, module: &str) -> Result<(), RegistryError> {
        let (package, name) = module.rsplit_once('.').ok_or_else(|| {
            RegistryError::ImproperlyConfigured(format!(
                "customization_module '{module}' must be a dotted module path"
            ))
        })?;
        self.import_module(package)?;
        attempt_import(self, &self.dashboards, module, package, name)?;
        Ok(())
    }

    // Compilation

    /// Discover, customize and compose the full route table.
    pub fn compile_routes(&self) -> Result<CompiledRoutes, RegistryError> {
        info!(site = self.slug(), "Compiling routes");
        self.autodiscover()?;
        for dashboard in self.dashboards.values() {
            dashboard.autodiscover(self)?;
        }

        self.apply_customizations();

        if let Some(module) = &self.settings.customization_module {
            self.import_customization_module(module)?;
        }

        let mut table = self.own_routes.clone();
        for dashboard in self.dashboards.values() {
            table.push(Route::Include {
                prefix: format!("{}/", dashboard.slug()),
                namespace: Some(dashboard.slug().to_string()),
                table: dashboard.compile_routes()?,
            });
        }

        let compiled = CompiledRoutes::new(table, self.namespace(), self.slug());
        info!(
            site = self.slug(),
            routes = compiled.flatten().len(),
            "Route table compiled"
        );
        Ok(compiled)
    }

    /// The compiled route table, built on first access.
    ///
    /// Concurrent first callers block until the single build finishes. A
    /// failed build is not cached.
    pub fn routes(&self) -> Result<Arc<CompiledRoutes>, RegistryError> {
        self.routes
            .get_or_try_init(|| self.compile_routes().map(Arc::new))
            .cloned()
    }

    pub fn is_compiled(&self) -> bool {
        self.routes.get().is_some()
    }

    /// Drop the memoized table so the next access rebuilds it.
    pub fn reset_routes(&mut self) {
        self.routes = OnceCell::new();
    }

    pub fn lazy_routes(self: &Arc<Self>) -> LazyRoutes {
        LazyRoutes::new(self.clone())
    }

    // URLs

    /// URL of a panel's index view.
    pub fn panel_absolute_url(&self, dashboard: &str, panel: &str) -> Result<String, RegistryError> {
        let routes = self.routes()?;
        let entry = self.get_dashboard(dashboard)?;
        let panel = entry.lookup_panel(ComponentRef::Slug(panel))?;
        let name = format!(
            "{}:{}:{}:{}",
            self.namespace(),
            entry.slug(),
            panel.slug(),
            panel.index_route_name()
        );
        routes.reverse(&name).ok_or_else(|| {
            info!(route = %name, "Error reversing absolute URL for panel");
            RegistryError::NoReverseMatch(name)
        })
    }

    /// URL of a dashboard: its default panel's URL.
    pub fn dashboard_absolute_url(&self, dashboard: &DashboardEntry) -> Result<String, RegistryError> {
        let default_panel = dashboard.default_panel().unwrap_or_default();
        self.panel_absolute_url(dashboard.slug(), &default_panel)
            .inspect_err(|err| {
                error!(dashboard = dashboard.slug(), error = %err, "Error reversing absolute URL");
            })
    }

    /// URL of the default dashboard.
    pub fn absolute_url(&self) -> Result<String, RegistryError> {
        let dashboard = self.get_default_dashboard()?;
        self.dashboard_absolute_url(&dashboard)
    }

    /// Where `user` lands after signing in.
    pub fn get_user_home(&self, user: &User) -> Result<String, RegistryError> {
        match &self.settings.user_home {
            UserHome::Callable(callable) => Ok(callable(user)),
            UserHome::Url(url) => Ok(url.clone()),
            UserHome::Reference(reference) => {
                let callable = self.manifest.resolve_callable(reference)?;
                Ok(callable(user))
            }
            UserHome::Default => self.absolute_url(),
        }
    }
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("slug", &self.slug())
            .field("namespace", &self.namespace())
            .field("dashboards", &self.dashboards.slugs())
            .field("compiled", &self.is_compiled())
            .finish()
    }
}

#[cfg(test)]
#[path = "site_tests.rs"]
mod tests;
