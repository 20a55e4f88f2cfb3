//! The compiled route table and its lazy handle.

use std::sync::Arc;

use panelkit_protocols::{FlatRoute, RegistryError, RouteTable};

use crate::site::Site;

/// Output of [`Site::compile_routes`]: the table plus the site's
/// namespace identifiers.
#[derive(Debug, Clone)]
pub struct CompiledRoutes {
    table: RouteTable,
    namespace: String,
    app_name: String,
}

impl CompiledRoutes {
    pub fn new(table: RouteTable, namespace: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self {
            table,
            namespace: namespace.into(),
            app_name: app_name.into(),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Reverse a name qualified with the site namespace, such as
    /// `horizon:project:instances:index`.
    pub fn reverse(&self, name: &str) -> Option<String> {
        let rest = name
            .strip_prefix(self.namespace.as_str())
            .and_then(|rest| rest.strip_prefix(':'))?;
        self.table.reverse(rest)
    }

    /// Flattened routes with names qualified by the site namespace.
    pub fn flatten(&self) -> Vec<FlatRoute> {
        self.table
            .flatten()
            .into_iter()
            .map(|mut route| {
                route.name = route.name.map(|name| format!("{}:{name}", self.namespace));
                route
            })
            .collect()
    }
}

/// Shared handle that compiles the site's routes on first use.
#[derive(Debug, Clone)]
pub struct LazyRoutes {
    site: Arc<Site>,
}

impl LazyRoutes {
    pub fn new(site: Arc<Site>) -> Self {
        Self { site }
    }

    pub fn get(&self) -> Result<Arc<CompiledRoutes>, RegistryError> {
        self.site.routes()
    }

    pub fn is_built(&self) -> bool {
        self.site.is_compiled()
    }

    pub fn site(&self) -> &Arc<Site> {
        &self.site
    }
}
