//! # Panelkit Protocols
//!
//! Shared definitions for the panelkit dashboard framework.
//! Contains traits and plain data only; registries and compilation live in
//! `panelkit-core`.
//!
//! ## Core Traits
//!
//! - [`Panel`] - A leaf component owning its own views
//! - [`Dashboard`] - A component grouping panels under one URL prefix
//! - [`PolicyEvaluator`] - Host-supplied policy predicate
//!
//! ## Route Tables
//!
//! [`RouteTable`] is an ordered tree of views and includes. Handlers carry
//! the access gates applied by [`Decorator`]s while the table is composed.

pub mod access;
pub mod component;
pub mod customization;
pub mod error;
pub mod route;

pub use access::{AccessCache, AccessContext, PolicyEvaluator, User};
pub use component::{ComponentMeta, Dashboard, Nav, Panel, PanelEntry, PanelGroupSpec};
pub use customization::{CustomizationEntry, EntryKind, PanelAction};
pub use error::{AccessError, RegistryError};
pub use route::{
    Decorator, FlatRoute, Handler, RequestContext, Route, RouteTable, ViewResponse,
};
