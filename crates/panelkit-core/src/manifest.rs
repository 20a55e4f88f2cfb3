//! Module manifest.
//!
//! Host applications describe their modules here instead of relying on
//! import side effects. A module is a dotted path bound to an initializer
//! that registers components on the site. Every prefix of a module path is
//! a package, so `app.instances.panel` makes `app` and `app.instances`
//! importable.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use panelkit_protocols::{Dashboard, Panel, RegistryError, User};

use crate::registry::RegisterableType;
use crate::site::Site;

/// Registration run when a module is imported.
pub type ModuleInit = Arc<dyn Fn(&Site) -> Result<(), RegistryError> + Send + Sync>;

/// A callable mapping a user to a URL.
pub type UserCallable = Arc<dyn Fn(&User) -> String + Send + Sync>;

#[derive(Clone, Default)]
pub struct ModuleManifest {
    packages: BTreeSet<String>,
    modules: BTreeMap<String, ModuleInit>,
    components: BTreeMap<String, RegisterableType>,
    callables: BTreeMap<String, UserCallable>,
}

impl ModuleManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a package and its parents.
    pub fn package(&mut self, path: &str) -> &mut Self {
        let mut prefix = String::new();
        for part in path.split('.') {
            if !prefix.is_empty() {
                prefix.push('.');
            }
            prefix.push_str(part);
            self.packages.insert(prefix.clone());
        }
        self
    }

    /// Declare a module with an initializer.
    pub fn module<F>(&mut self, path: &str, init: F) -> &mut Self
    where
        F: Fn(&Site) -> Result<(), RegistryError> + Send + Sync + 'static,
    {
        if let Some((parent, _)) = path.rsplit_once('.') {
            self.package(parent);
        }
        self.modules.insert(path.to_string(), Arc::new(init));
        self
    }

    /// Expose a component under a dotted reference such as
    /// `app.panels.NetworkPanel`.
    pub fn component(&mut self, path: &str, component: RegisterableType) -> &mut Self {
        if let Some((parent, _)) = path.rsplit_once('.') {
            self.package(parent);
        }
        self.components.insert(path.to_string(), component);
        self
    }

    pub fn panel<P: Panel + Default>(&mut self, path: &str) -> &mut Self {
        self.component(path, RegisterableType::panel::<P>())
    }

    pub fn dashboard<D: Dashboard + Default>(&mut self, path: &str) -> &mut Self {
        self.component(path, RegisterableType::dashboard::<D>())
    }

    /// Expose a user callable under a dotted reference.
    pub fn callable<F>(&mut self, path: &str, callable: F) -> &mut Self
    where
        F: Fn(&User) -> String + Send + Sync + 'static,
    {
        if let Some((parent, _)) = path.rsplit_once('.') {
            self.package(parent);
        }
        self.callables.insert(path.to_string(), Arc::new(callable));
        self
    }

    /// Merge another manifest into this one. Later definitions win.
    pub fn merge(&mut self, other: ModuleManifest) -> &mut Self {
        self.packages.extend(other.packages);
        self.modules.extend(other.modules);
        self.components.extend(other.components);
        self.callables.extend(other.callables);
        self
    }

    /// Whether `path` names a module or a package.
    pub fn has_module(&self, path: &str) -> bool {
        self.modules.contains_key(path) || self.packages.contains(path)
    }

    /// Whether `package` has a submodule or subpackage called `name`.
    pub fn has_submodule(&self, package: &str, name: &str) -> bool {
        self.has_module(&format!("{package}.{name}"))
    }

    pub fn is_package(&self, path: &str) -> bool {
        self.packages.contains(path)
    }

    pub fn init(&self, path: &str) -> Option<ModuleInit> {
        self.modules.get(path).cloned()
    }

    /// Resolve a dotted component reference.
    pub fn resolve_component(&self, reference: &str) -> Result<RegisterableType, RegistryError> {
        let (module, attr) = split_reference(reference)?;
        if !self.has_module(module) {
            return Err(RegistryError::ModuleNotFound(module.to_string()));
        }
        self.components.get(reference).copied().ok_or_else(|| {
            RegistryError::ImproperlyConfigured(format!(
                "module '{module}' has no component '{attr}'"
            ))
        })
    }

    /// Resolve a dotted callable reference.
    pub fn resolve_callable(&self, reference: &str) -> Result<UserCallable, RegistryError> {
        let (module, attr) = split_reference(reference)?;
        if !self.has_module(module) {
            return Err(RegistryError::ModuleNotFound(module.to_string()));
        }
        self.callables.get(reference).cloned().ok_or_else(|| {
            RegistryError::ImproperlyConfigured(format!(
                "module '{module}' has no callable '{attr}'"
            ))
        })
    }

    pub fn module_paths(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }
}

fn split_reference(reference: &str) -> Result<(&str, &str), RegistryError> {
    reference
        .rsplit_once('.')
        .filter(|(module, attr)| !module.is_empty() && !attr.is_empty())
        .ok_or_else(|| {
            RegistryError::ImproperlyConfigured(format!(
                "'{reference}' is not a dotted reference"
            ))
        })
}

impl fmt::Debug for ModuleManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleManifest")
            .field("packages", &self.packages)
            .field("modules", &self.modules.keys().collect::<Vec<_>>())
            .field("components", &self.components)
            .field("callables", &self.callables.keys().collect::<Vec<_>>())
            .finish()
    }
}
