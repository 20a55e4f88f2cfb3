//! Component identity: type id, constructor and registration gate.

use std::any::TypeId;
use std::fmt;

use panelkit_protocols::{Dashboard, Panel, RegistryError};

use super::base::{short_type_name, ComponentRef};

/// A registrable component type.
pub struct ComponentType<T: ?Sized> {
    id: TypeId,
    name: &'static str,
    construct: fn() -> Box<T>,
    can_register: fn() -> bool,
}

impl<T: ?Sized> Clone for ComponentType<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for ComponentType<T> {}

impl<T: ?Sized> fmt::Debug for ComponentType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentType").field("name", &self.name).finish()
    }
}

pub type PanelType = ComponentType<dyn Panel>;
pub type DashboardType = ComponentType<dyn Dashboard>;

fn construct_panel<P: Panel + Default>() -> Box<dyn Panel> {
    Box::new(P::default())
}

fn construct_dashboard<D: Dashboard + Default>() -> Box<dyn Dashboard> {
    Box::new(D::default())
}

impl ComponentType<dyn Panel> {
    pub fn of<P: Panel + Default>() -> Self {
        Self {
            id: TypeId::of::<P>(),
            name: short_type_name(std::any::type_name::<P>()),
            construct: construct_panel::<P>,
            can_register: P::can_register,
        }
    }
}

impl ComponentType<dyn Dashboard> {
    pub fn of<D: Dashboard + Default>() -> Self {
        Self {
            id: TypeId::of::<D>(),
            name: short_type_name(std::any::type_name::<D>()),
            construct: construct_dashboard::<D>,
            can_register: D::can_register,
        }
    }
}

impl<T: ?Sized> ComponentType<T> {
    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn construct(&self) -> Box<T> {
        (self.construct)()
    }

    pub fn can_register(&self) -> bool {
        (self.can_register)()
    }

    pub fn component_ref(&self) -> ComponentRef<'static> {
        ComponentRef::Type {
            id: self.id,
            name: self.name,
        }
    }
}

/// The closed set of registrable kinds.
#[derive(Debug, Clone, Copy)]
pub enum RegisterableType {
    Dashboard(DashboardType),
    Panel(PanelType),
}

impl RegisterableType {
    pub fn panel<P: Panel + Default>() -> Self {
        RegisterableType::Panel(PanelType::of::<P>())
    }

    pub fn dashboard<D: Dashboard + Default>() -> Self {
        RegisterableType::Dashboard(DashboardType::of::<D>())
    }

    pub fn name(&self) -> &'static str {
        match self {
            RegisterableType::Dashboard(ty) => ty.name(),
            RegisterableType::Panel(ty) => ty.name(),
        }
    }

    pub fn expect_panel(self) -> Result<PanelType, RegistryError> {
        match self {
            RegisterableType::Panel(ty) => Ok(ty),
            RegisterableType::Dashboard(ty) => Err(RegistryError::InvalidComponent(format!(
                "{} is a Dashboard; only Panel types may be registered here.",
                ty.name()
            ))),
        }
    }

    pub fn expect_dashboard(self) -> Result<DashboardType, RegistryError> {
        match self {
            RegisterableType::Dashboard(ty) => Ok(ty),
            RegisterableType::Panel(ty) => Err(RegistryError::InvalidComponent(format!(
                "{} is a Panel; only Dashboard types may be registered here.",
                ty.name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Instances, Project};

    #[test]
    fn test_panel_type_identity() {
        let ty = PanelType::of::<Instances>();
        assert_eq!(ty.name(), "Instances");
        assert_eq!(ty.id(), TypeId::of::<Instances>());
        assert_eq!(ty.construct().slug(), "instances");
        assert!(ty.can_register());
    }

    #[test]
    fn test_component_ref_matches_of() {
        assert_eq!(
            PanelType::of::<Instances>().component_ref(),
            ComponentRef::of::<Instances>()
        );
    }

    #[test]
    fn test_expect_panel_rejects_dashboard() {
        let err = RegisterableType::dashboard::<Project>()
            .expect_panel()
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidComponent(_)));
        assert!(err.to_string().contains("Project is a Dashboard"));
    }

    #[test]
    fn test_expect_dashboard_rejects_panel() {
        let err = RegisterableType::panel::<Instances>()
            .expect_dashboard()
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid component: Instances is a Panel"));
        assert!(RegisterableType::dashboard::<Project>().expect_dashboard().is_ok());
    }
}
