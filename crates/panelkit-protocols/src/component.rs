//! Panel and dashboard definitions.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::access::AccessContext;
use crate::error::RegistryError;
use crate::route::RouteTable;

/// Navigation visibility of a component.
#[derive(Clone, Default)]
pub enum Nav {
    #[default]
    Show,
    Hide,
    /// Visible when the predicate holds for the current context.
    When(Arc<dyn Fn(&AccessContext) -> bool + Send + Sync>),
}

impl Nav {
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(&AccessContext) -> bool + Send + Sync + 'static,
    {
        Nav::When(Arc::new(predicate))
    }

    pub fn is_visible(&self, ctx: &AccessContext) -> bool {
        match self {
            Nav::Show => true,
            Nav::Hide => false,
            Nav::When(predicate) => predicate(ctx),
        }
    }
}

impl From<bool> for Nav {
    fn from(visible: bool) -> Self {
        if visible { Nav::Show } else { Nav::Hide }
    }
}

impl fmt::Debug for Nav {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nav::Show => f.write_str("Show"),
            Nav::Hide => f.write_str("Hide"),
            Nav::When(_) => f.write_str("When(..)"),
        }
    }
}

/// Attributes shared by every registrable component.
#[derive(Debug, Clone, Default)]
pub struct ComponentMeta {
    /// Unique within the parent registry.
    pub slug: String,
    pub name: String,
    /// Rules handed to the policy evaluator by `allowed`.
    pub policy_rules: Vec<String>,
    /// Permissions enforced on every route the component serves.
    pub permissions: BTreeSet<String>,
    pub nav: Nav,
}

impl ComponentMeta {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_policy_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policy_rules = rules.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_nav(mut self, nav: impl Into<Nav>) -> Self {
        self.nav = nav.into();
        self
    }

    /// Fail when the slug is blank.
    pub fn validate(&self, kind: &str) -> Result<(), RegistryError> {
        if self.slug.trim().is_empty() {
            return Err(RegistryError::ImproperlyConfigured(format!(
                "Every {kind} must have a slug."
            )));
        }
        Ok(())
    }
}

/// A leaf component serving its own views inside one dashboard.
pub trait Panel: Send + Sync + 'static {
    fn meta(&self) -> &ComponentMeta;

    /// Name of the view that is the panel's landing page.
    fn index_route_name(&self) -> &str {
        "index"
    }

    /// The panel's own views, relative to its mount point.
    fn routes(&self) -> RouteTable;

    /// Template search path published while the panel is registered.
    fn template_dir(&self) -> Option<PathBuf> {
        None
    }

    fn allowed(&self, ctx: &AccessContext) -> bool {
        ctx.check_rules(&self.meta().policy_rules)
    }

    /// Registration gate consulted by the customization layer.
    fn can_register() -> bool
    where
        Self: Sized,
    {
        true
    }

    fn slug(&self) -> &str {
        &self.meta().slug
    }

    fn name(&self) -> &str {
        &self.meta().name
    }
}

/// Definition of a dashboard: metadata plus declared panel layout.
///
/// Registration wraps the definition with the registry of its panels and
/// the mutable layout state the customization layer edits.
pub trait Dashboard: Send + Sync + 'static {
    fn meta(&self) -> &ComponentMeta;

    /// Package that panel modules are discovered under.
    fn package(&self) -> &str;

    /// Declared layout: loose panel slugs, groups, or a mix.
    fn panels(&self) -> Vec<PanelEntry> {
        Vec::new()
    }

    fn default_panel(&self) -> Option<&str> {
        None
    }

    /// Public dashboards do not require authentication.
    fn public(&self) -> bool {
        false
    }

    /// Extra views mounted ahead of the panels.
    fn routes(&self) -> RouteTable {
        RouteTable::new()
    }

    /// The dashboard's own policy check, not including its panels.
    fn allowed(&self, ctx: &AccessContext) -> bool {
        ctx.check_rules(&self.meta().policy_rules)
    }

    fn can_register() -> bool
    where
        Self: Sized,
    {
        true
    }

    fn slug(&self) -> &str {
        &self.meta().slug
    }

    fn name(&self) -> &str {
        &self.meta().name
    }
}

/// One item of a dashboard's declared panel layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEntry {
    Panel(String),
    Group(PanelGroupSpec),
}

impl From<&str> for PanelEntry {
    fn from(slug: &str) -> Self {
        PanelEntry::Panel(slug.to_string())
    }
}

impl From<PanelGroupSpec> for PanelEntry {
    fn from(group: PanelGroupSpec) -> Self {
        PanelEntry::Group(group)
    }
}

/// Declaration of a named, ordered group of panel slugs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelGroupSpec {
    pub slug: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub panels: Vec<String>,
}

impl PanelGroupSpec {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: None,
            panels: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_panels<I, S>(mut self, panels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.panels = panels.into_iter().map(Into::into).collect();
        self
    }
}
