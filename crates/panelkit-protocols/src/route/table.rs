use std::sync::Arc;

use super::handler::{Decorator, Handler, RequestContext, ViewResponse};

/// One entry of a route table.
#[derive(Debug, Clone)]
pub enum Route {
    /// A terminal view. Patterns are relative and use `{name}` segments
    /// for captured parameters, e.g. `"{instance_id}/"`.
    View {
        pattern: String,
        name: Option<String>,
        handler: Handler,
    },
    /// A nested table mounted under `prefix`.
    Include {
        prefix: String,
        namespace: Option<String>,
        table: RouteTable,
    },
}

impl Route {
    fn decorate(&mut self, decorator: &Decorator) {
        match self {
            Route::View { handler, .. } => handler.decorate(decorator),
            Route::Include { table, .. } => table.decorate(decorator),
        }
    }
}

/// A route with its full path, as seen by a dispatcher.
#[derive(Debug, Clone)]
pub struct FlatRoute {
    /// Absolute path pattern, always starting with `/`.
    pub path: String,
    /// Fully namespaced route name, e.g. `horizon:project:instances:index`.
    pub name: Option<String>,
    pub handler: Handler,
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named view.
    pub fn view<F>(mut self, pattern: impl Into<String>, name: impl Into<String>, view: F) -> Self
    where
        F: Fn(&RequestContext) -> ViewResponse + Send + Sync + 'static,
    {
        self.routes.push(Route::View {
            pattern: pattern.into(),
            name: Some(name.into()),
            handler: Handler::from_view(Arc::new(view)),
        });
        self
    }

    /// Append a nested table.
    pub fn include(
        mut self,
        prefix: impl Into<String>,
        namespace: Option<String>,
        table: RouteTable,
    ) -> Self {
        self.routes.push(Route::Include {
            prefix: prefix.into(),
            namespace,
            table,
        });
        self
    }

    pub fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn extend(&mut self, other: RouteTable) {
        self.routes.extend(other.routes);
    }

    /// Apply `decorator` to every handler in the table, recursively.
    pub fn decorate(&mut self, decorator: &Decorator) {
        for route in &mut self.routes {
            route.decorate(decorator);
        }
    }

    pub fn decorated(mut self, decorator: &Decorator) -> Self {
        self.decorate(decorator);
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolve a `:`-separated route name to an absolute path.
    ///
    /// Includes without a namespace are transparent. Patterns with
    /// parameters cannot be reversed without arguments and are skipped.
    /// The first match in table order wins.
    pub fn reverse(&self, name: &str) -> Option<String> {
        let parts: Vec<&str> = name.split(':').collect();
        self.reverse_parts(&parts).map(|path| format!("/{path}"))
    }

    fn reverse_parts(&self, parts: &[&str]) -> Option<String> {
        let (head, rest) = parts.split_first()?;
        for route in &self.routes {
            match route {
                Route::View {
                    pattern,
                    name: Some(name),
                    ..
                } if rest.is_empty() && name == head && !pattern.contains('{') => {
                    return Some(pattern.clone());
                }
                Route::Include {
                    prefix,
                    namespace: Some(namespace),
                    table,
                } if namespace == head => {
                    if let Some(path) = table.reverse_parts(rest) {
                        return Some(format!("{prefix}{path}"));
                    }
                }
                Route::Include {
                    prefix,
                    namespace: None,
                    table,
                } => {
                    if let Some(path) = table.reverse_parts(parts) {
                        return Some(format!("{prefix}{path}"));
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Flatten into absolute paths in table order.
    pub fn flatten(&self) -> Vec<FlatRoute> {
        let mut out = Vec::new();
        self.flatten_into("/", &[], &mut out);
        out
    }

    fn flatten_into<'a>(&'a self, base: &str, namespaces: &[&'a str], out: &mut Vec<FlatRoute>) {
        for route in &self.routes {
            match route {
                Route::View {
                    pattern,
                    name,
                    handler,
                } => {
                    let name = name.as_ref().map(|name| {
                        let mut parts = namespaces.to_vec();
                        parts.push(name.as_str());
                        parts.join(":")
                    });
                    out.push(FlatRoute {
                        path: format!("{base}{pattern}"),
                        name,
                        handler: handler.clone(),
                    });
                }
                Route::Include {
                    prefix,
                    namespace,
                    table,
                } => {
                    let mut nested = namespaces.to_vec();
                    if let Some(namespace) = namespace {
                        nested.push(namespace.as_str());
                    }
                    table.flatten_into(&format!("{base}{prefix}"), &nested, out);
                }
            }
        }
    }
}
