//! Generic component registry.
//!
//! Holds at most one instance per component type, in registration order.
//! Shared by the site (dashboards) and by every dashboard (panels).

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use panelkit_protocols::{Panel, RegistryError};

/// Trait for items that can be stored in a registry.
pub trait Registerable: Send + Sync {
    /// Slug the item is looked up by.
    fn registry_id(&self) -> &str;
}

impl Registerable for dyn Panel {
    fn registry_id(&self) -> &str {
        self.slug()
    }
}

/// Identifies a registered component by type or by slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentRef<'a> {
    Type { id: TypeId, name: &'static str },
    Slug(&'a str),
}

impl ComponentRef<'static> {
    pub fn of<C: 'static>() -> Self {
        ComponentRef::Type {
            id: TypeId::of::<C>(),
            name: short_type_name(std::any::type_name::<C>()),
        }
    }
}

impl<'a> From<&'a str> for ComponentRef<'a> {
    fn from(slug: &'a str) -> Self {
        ComponentRef::Slug(slug)
    }
}

impl<'a> From<&'a String> for ComponentRef<'a> {
    fn from(slug: &'a String) -> Self {
        ComponentRef::Slug(slug.as_str())
    }
}

impl fmt::Display for ComponentRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentRef::Type { name, .. } => f.write_str(name),
            ComponentRef::Slug(slug) => f.write_str(slug),
        }
    }
}

/// Last path segment of a type name.
pub(crate) fn short_type_name(name: &'static str) -> &'static str {
    name.rsplit("::").next().unwrap_or(name)
}

/// Owner of a nested registry, named in lookup errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryScope {
    pub kind: String,
    pub slug: String,
    pub parent: Option<(String, String)>,
}

impl RegistryScope {
    pub fn new(kind: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            slug: slug.into(),
            parent: None,
        }
    }

    pub fn within(mut self, kind: impl Into<String>, slug: impl Into<String>) -> Self {
        self.parent = Some((kind.into(), slug.into()));
        self
    }
}

struct Entry<T: ?Sized> {
    type_id: TypeId,
    item: Arc<T>,
}

impl<T: ?Sized> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            type_id: self.type_id,
            item: self.item.clone(),
        }
    }
}

/// Registry contents captured by [`Registry::snapshot`].
pub struct RegistrySnapshot<T: ?Sized> {
    entries: Vec<Entry<T>>,
}

impl<T: ?Sized> RegistrySnapshot<T> {
    pub fn slugs(&self) -> Vec<String>
    where
        T: Registerable,
    {
        self.entries
            .iter()
            .map(|entry| entry.item.registry_id().to_string())
            .collect()
    }
}

/// Insertion-ordered registry keyed by component type.
pub struct Registry<T: ?Sized + Registerable> {
    kind: &'static str,
    scope: Option<RegistryScope>,
    entries: RwLock<Vec<Entry<T>>>,
}

impl<T: ?Sized + Registerable> Registry<T> {
    /// Create an empty registry of `kind` components.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            scope: None,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Create a registry owned by another component.
    pub fn scoped(kind: &'static str, scope: RegistryScope) -> Self {
        Self {
            kind,
            scope: Some(scope),
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn scope(&self) -> Option<&RegistryScope> {
        self.scope.as_ref()
    }

    /// Register the component identified by `type_id`.
    ///
    /// Registering a type that is already present returns the existing
    /// instance without calling `construct`.
    pub fn register_with<F>(&self, type_id: TypeId, construct: F) -> Result<Arc<T>, RegistryError>
    where
        F: FnOnce() -> Result<Arc<T>, RegistryError>,
    {
        if let Some(existing) = self.find_type(type_id) {
            return Ok(existing);
        }

        let item = construct()?;

        let mut entries = self.entries.write();
        if let Some(existing) = entries.iter().find(|entry| entry.type_id == type_id) {
            return Ok(existing.item.clone());
        }
        entries.push(Entry {
            type_id,
            item: item.clone(),
        });
        Ok(item)
    }

    /// Remove a component and return it.
    pub fn remove(&self, component: ComponentRef<'_>) -> Result<Arc<T>, RegistryError> {
        let mut entries = self.entries.write();
        let index = entries
            .iter()
            .position(|entry| Self::matches(entry, component))
            .ok_or_else(|| self.not_registered(component))?;
        Ok(entries.remove(index).item)
    }

    /// Remove a component. Fails with `NotRegistered` when absent.
    pub fn unregister(&self, component: ComponentRef<'_>) -> Result<bool, RegistryError> {
        self.remove(component).map(|_| true)
    }

    /// Look a component up by type or slug.
    pub fn lookup(&self, component: ComponentRef<'_>) -> Result<Arc<T>, RegistryError> {
        self.entries
            .read()
            .iter()
            .find(|entry| Self::matches(entry, component))
            .map(|entry| entry.item.clone())
            .ok_or_else(|| self.not_registered(component))
    }

    pub fn get(&self, slug: &str) -> Option<Arc<T>> {
        self.lookup(ComponentRef::Slug(slug)).ok()
    }

    pub fn contains(&self, component: ComponentRef<'_>) -> bool {
        self.entries
            .read()
            .iter()
            .any(|entry| Self::matches(entry, component))
    }

    /// All registered items in registration order.
    pub fn values(&self) -> Vec<Arc<T>> {
        self.entries.read().iter().map(|entry| entry.item.clone()).collect()
    }

    pub fn slugs(&self) -> Vec<String> {
        self.entries
            .read()
            .iter()
            .map(|entry| entry.item.registry_id().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn snapshot(&self) -> RegistrySnapshot<T> {
        RegistrySnapshot {
            entries: self.entries.read().clone(),
        }
    }

    /// Replace the contents with a previous snapshot.
    pub fn restore(&self, snapshot: RegistrySnapshot<T>) {
        *self.entries.write() = snapshot.entries;
    }

    /// Build the `NotRegistered` error for `component`.
    pub fn not_registered(&self, component: ComponentRef<'_>) -> RegistryError {
        let message = match &self.scope {
            Some(scope) => {
                let mut message = format!(
                    "{} with slug \"{}\" is not registered with {} \"{}\"",
                    self.kind, component, scope.kind, scope.slug
                );
                if let Some((kind, slug)) = &scope.parent {
                    message.push_str(&format!(" ({kind} \"{slug}\")"));
                }
                message.push('.');
                message
            }
            None => format!(
                "{} with slug \"{}\" is not registered.",
                self.kind, component
            ),
        };
        RegistryError::NotRegistered(message)
    }

    fn find_type(&self, type_id: TypeId) -> Option<Arc<T>> {
        self.entries
            .read()
            .iter()
            .find(|entry| entry.type_id == type_id)
            .map(|entry| entry.item.clone())
    }

    fn matches(entry: &Entry<T>, component: ComponentRef<'_>) -> bool {
        match component {
            ComponentRef::Type { id, .. } => entry.type_id == id,
            ComponentRef::Slug(slug) => entry.item.registry_id() == slug,
        }
    }
}

#[cfg(test)]
#[path = "base_tests.rs"]
mod tests;
