//! Route tables.
//!
//! A [`RouteTable`] is an ordered tree: terminal views bound to a path
//! pattern, and nested tables included under a prefix. Tables are composed
//! bottom-up (panel, dashboard, site) and decorated as they are composed.
//! Matching against incoming paths belongs to the transport adapter.

mod handler;
mod table;

pub use handler::{Decorator, Handler, RequestContext, ViewFn, ViewResponse};
pub use table::{FlatRoute, Route, RouteTable};

#[cfg(test)]
#[path = "route_tests.rs"]
mod tests;
