//! Registered dashboards.
//!
//! A [`DashboardEntry`] wraps a [`Dashboard`] definition with the registry
//! of its panels and the layout state edited by discovery and by the
//! customization layer.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use panelkit_protocols::{
    AccessContext, Dashboard, Decorator, Panel, PanelEntry, RegistryError, Route, RouteTable,
};

use crate::discovery::{attempt_import, Restorable};
use crate::panel_group::{self, PanelGroup, OTHER_PANEL_GROUP, OTHER_PANEL_GROUP_NAME};
use crate::registry::{
    ComponentRef, PanelType, RegisterableType, Registerable, Registry, RegistryScope,
    RegistrySnapshot,
};
use crate::site::Site;
use crate::templates::TemplateDirectories;

/// Layout state of a dashboard.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Declared entries; customization appends to these.
    pub declared: Vec<PanelEntry>,
    /// Groups frozen by the last discovery pass.
    pub groups: Option<Vec<PanelGroup>>,
    pub default_panel: Option<String>,
    pub discovered: bool,
}

pub struct DashboardEntry {
    definition: Box<dyn Dashboard>,
    panels: Registry<dyn Panel>,
    state: RwLock<DashboardState>,
    templates: Arc<TemplateDirectories>,
}

impl Registerable for DashboardEntry {
    fn registry_id(&self) -> &str {
        self.definition.slug()
    }
}

impl DashboardEntry {
    pub(crate) fn new(
        definition: Box<dyn Dashboard>,
        scope: RegistryScope,
        templates: Arc<TemplateDirectories>,
    ) -> Self {
        let state = DashboardState {
            declared: definition.panels(),
            groups: None,
            default_panel: definition.default_panel().map(str::to_string),
            discovered: false,
        };
        Self {
            definition,
            panels: Registry::scoped("Panel", scope),
            state: RwLock::new(state),
            templates,
        }
    }

    pub fn definition(&self) -> &dyn Dashboard {
        self.definition.as_ref()
    }

    pub fn slug(&self) -> &str {
        self.definition.slug()
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn public(&self) -> bool {
        self.definition.public()
    }

    /// Register a panel on this dashboard.
    ///
    /// Registering the same type again returns the existing instance. The
    /// panel's template directory is published when it exists on disk.
    pub fn register(&self, panel: PanelType) -> Result<Arc<dyn Panel>, RegistryError> {
        self.panels.register_with(panel.id(), || {
            let instance: Arc<dyn Panel> = Arc::from(panel.construct());
            instance.meta().validate("Panel")?;
            if let Some(dir) = instance.template_dir() {
                self.templates.publish(self.slug(), instance.slug(), &dir);
            }
            Ok(instance)
        })
    }

    /// Register a resolved component, which must be a panel.
    pub fn register_component(
        &self,
        component: RegisterableType,
    ) -> Result<Arc<dyn Panel>, RegistryError> {
        self.register(component.expect_panel()?)
    }

    /// Unregister a panel and drop its template directory.
    pub fn unregister(&self, panel: ComponentRef<'_>) -> Result<bool, RegistryError> {
        let removed = self.panels.remove(panel)?;
        self.templates.remove(self.slug(), removed.slug());
        Ok(true)
    }

    pub fn get_panel(&self, slug: &str) -> Option<Arc<dyn Panel>> {
        self.panels.get(slug)
    }

    pub fn lookup_panel(&self, panel: ComponentRef<'_>) -> Result<Arc<dyn Panel>, RegistryError> {
        self.panels.lookup(panel)
    }

    /// Registered panels in registration order.
    pub fn registered_panels(&self) -> Vec<Arc<dyn Panel>> {
        self.panels.values()
    }

    pub fn panel_registry(&self) -> &Registry<dyn Panel> {
        &self.panels
    }

    pub fn default_panel(&self) -> Option<String> {
        self.state.read().default_panel.clone()
    }

    pub fn set_default_panel(&self, slug: impl Into<String>) {
        self.state.write().default_panel = Some(slug.into());
    }

    pub fn state(&self) -> DashboardState {
        self.state.read().clone()
    }

    /// Append an entry to the declared layout.
    ///
    /// An entry already declared, or a panel slug already declared in any
    /// entry, is not added again. Returns whether the layout changed.
    pub fn declare(&self, entry: PanelEntry) -> bool {
        let mut state = self.state.write();
        let duplicate = state.declared.iter().any(|existing| match (&entry, existing) {
            (PanelEntry::Panel(slug), PanelEntry::Panel(other)) => slug == other,
            (PanelEntry::Panel(slug), PanelEntry::Group(group)) => group.panels.contains(slug),
            (entry, existing) => entry == existing,
        });
        if !duplicate {
            state.declared.push(entry);
        }
        !duplicate
    }

    /// Mark discovery incomplete so the next pass re-reads the layout.
    pub fn reset_discovery(&self) {
        self.state.write().discovered = false;
    }

    pub fn is_discovered(&self) -> bool {
        self.state.read().discovered
    }

    pub fn get_panel_group(&self, slug: &str) -> Option<PanelGroup> {
        self.state
            .read()
            .groups
            .as_ref()
            .and_then(|groups| groups.iter().find(|group| group.slug == slug).cloned())
    }

    /// Append a panel slug to a discovered group, unless already a member.
    pub fn add_to_group(&self, group: &str, panel: &str) -> Result<(), RegistryError> {
        let mut state = self.state.write();
        let target = state
            .groups
            .as_mut()
            .and_then(|groups| groups.iter_mut().find(|g| g.slug == group))
            .ok_or_else(|| {
                RegistryError::NotRegistered(format!(
                    "Panel group \"{group}\" is not defined on Dashboard \"{}\".",
                    self.definition.slug()
                ))
            })?;
        if !target.panels.iter().any(|slug| slug == panel) {
            target.panels.push(panel.to_string());
        }
        Ok(())
    }

    /// Groups in declared order, plus an `other` group holding registered
    /// panels that no group claims.
    pub fn get_panel_groups(&self) -> Vec<PanelGroup> {
        let mut groups = self.state.read().groups.clone().unwrap_or_default();
        let claimed: Vec<String> = groups
            .iter()
            .flat_map(|group| group.iter(self))
            .map(|panel| panel.slug().to_string())
            .collect();

        let leftovers: Vec<String> = self
            .panels
            .slugs()
            .into_iter()
            .filter(|slug| !claimed.contains(slug))
            .collect();
        if !leftovers.is_empty() {
            groups.push(PanelGroup::new(
                OTHER_PANEL_GROUP,
                Some(OTHER_PANEL_GROUP_NAME.to_string()),
                leftovers,
            ));
        }
        groups
    }

    /// Registered panels in group order.
    pub fn get_panels(&self) -> Vec<Arc<dyn Panel>> {
        self.get_panel_groups()
            .iter()
            .flat_map(|group| group.iter(self).collect::<Vec<_>>())
            .collect()
    }

    /// Discover declared panels. Runs once until [`reset_discovery`].
    ///
    /// Each declared slug `s` imports the module `<package>.<s>.panel`.
    ///
    /// [`reset_discovery`]: DashboardEntry::reset_discovery
    pub fn autodiscover(&self, site: &Site) -> Result<(), RegistryError> {
        let slugs = {
            let mut state = self.state.write();
            if state.discovered {
                return Ok(());
            }
            let (groups, slugs) = panel_group::normalize(&state.declared);
            state.groups = Some(groups);
            slugs
        };

        let package = self.definition.package();
        for slug in &slugs {
            let module = format!("{package}.{slug}.panel");
            attempt_import(site, self, &module, package, slug)?;
        }

        self.state.write().discovered = true;
        info!(
            dashboard = self.slug(),
            panels = self.panels.len(),
            "Dashboard discovery complete"
        );
        Ok(())
    }

    /// Compose the dashboard's route table.
    ///
    /// Panels are mounted in registration order under their slug, with dots
    /// as path separators. The default panel is mounted last, at the root.
    pub fn compile_routes(&self) -> Result<RouteTable, RegistryError> {
        let mut table = self.definition.routes();
        let default_slug = self.default_panel();
        let mut default_panel = None;

        for panel in self.panels.values() {
            if default_slug.as_deref() == Some(panel.slug()) {
                default_panel = Some(panel);
                continue;
            }
            table.push(Route::Include {
                prefix: format!("{}/", panel.slug().replace('.', "/")),
                namespace: Some(panel.slug().to_string()),
                table: panel_routes(panel.as_ref()),
            });
        }

        let default_panel = default_panel.ok_or_else(|| {
            RegistryError::NotRegistered(format!(
                "The default panel \"{}\" is not registered.",
                default_slug.as_deref().unwrap_or_default()
            ))
        })?;
        table.push(Route::Include {
            prefix: String::new(),
            namespace: Some(default_panel.slug().to_string()),
            table: panel_routes(default_panel.as_ref()),
        });

        if !self.definition.public() {
            table.decorate(&Decorator::RequireAuth);
        }
        table.decorate(&Decorator::RequirePerms(
            self.definition.meta().permissions.clone(),
        ));
        table.decorate(&Decorator::CurrentDashboard(self.slug().to_string()));
        Ok(table)
    }

    /// The dashboard's own policy check, then whether any panel passes.
    pub fn allowed(&self, ctx: &AccessContext) -> bool {
        if !self.definition.allowed(ctx) {
            return false;
        }
        self.get_panels()
            .iter()
            .any(|panel| self.panel_can_access(panel.as_ref(), ctx))
    }

    /// [`allowed`](DashboardEntry::allowed), memoized through the context.
    pub fn can_access(&self, ctx: &AccessContext) -> bool {
        ctx.cached(self.slug(), || self.allowed(ctx))
    }

    pub fn panel_can_access(&self, panel: &dyn Panel, ctx: &AccessContext) -> bool {
        let key = format!("{}.{}", self.slug(), panel.slug());
        ctx.cached(&key, || panel.allowed(ctx))
    }
}

/// A panel's own table, gated by its permissions and tagged.
fn panel_routes(panel: &dyn Panel) -> RouteTable {
    panel
        .routes()
        .decorated(&Decorator::RequirePerms(panel.meta().permissions.clone()))
        .decorated(&Decorator::CurrentPanel(panel.slug().to_string()))
}

impl Restorable for DashboardEntry {
    type Snapshot = RegistrySnapshot<dyn Panel>;

    fn snapshot(&self) -> Self::Snapshot {
        self.panels.snapshot()
    }

    /// Restore the panel registry and drop template directories of panels
    /// that are no longer registered.
    fn restore(&self, snapshot: Self::Snapshot) {
        let kept = snapshot.slugs();
        for slug in self.panels.slugs() {
            if !kept.contains(&slug) && self.templates.remove(self.slug(), &slug).is_some() {
                debug!(dashboard = self.slug(), panel = %slug, "Dropped template directory");
            }
        }
        self.panels.restore(snapshot);
    }
}

impl std::fmt::Debug for DashboardEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardEntry")
            .field("slug", &self.slug())
            .field("panels", &self.panels.slugs())
            .field("state", &*self.state.read())
            .finish()
    }
}

#[cfg(test)]
#[path = "dashboard_tests.rs"]
mod tests;
