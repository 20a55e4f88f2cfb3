//! View handlers and the decorators that gate them.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::access::User;
use crate::error::AccessError;

/// Response produced by a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ViewResponse {
    pub fn ok(body: serde_json::Value) -> Self {
        Self { status: 200, body }
    }

    pub fn with_status(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }
}

/// Per-request state seen by handlers.
///
/// `dashboard` and `panel` are filled in by the context-tagging
/// decorators before the view runs.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub path: String,
    pub user: Option<User>,
    pub params: HashMap<String, String>,
    pub dashboard: Option<String>,
    pub panel: Option<String>,
}

impl RequestContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

pub type ViewFn = Arc<dyn Fn(&RequestContext) -> ViewResponse + Send + Sync>;

/// A cross-cutting wrapper applied to every handler of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decorator {
    /// Reject unauthenticated users.
    RequireAuth,
    /// Reject users lacking any of these permissions.
    RequirePerms(BTreeSet<String>),
    /// Record the owning dashboard on the request.
    CurrentDashboard(String),
    /// Record the owning panel on the request.
    CurrentPanel(String),
}

impl Decorator {
    pub fn require_perms<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Decorator::RequirePerms(permissions.into_iter().map(Into::into).collect())
    }
}

/// A view plus the gates accumulated from decoration.
#[derive(Clone)]
pub struct Handler {
    view: ViewFn,
    requires_auth: bool,
    required_perms: BTreeSet<String>,
    dashboard: Option<String>,
    panel: Option<String>,
}

impl Handler {
    pub fn new<F>(view: F) -> Self
    where
        F: Fn(&RequestContext) -> ViewResponse + Send + Sync + 'static,
    {
        Self::from_view(Arc::new(view))
    }

    pub fn from_view(view: ViewFn) -> Self {
        Self {
            view,
            requires_auth: false,
            required_perms: BTreeSet::new(),
            dashboard: None,
            panel: None,
        }
    }

    /// Apply a decorator.
    ///
    /// Gates accumulate. Context tags keep the innermost value, so a panel
    /// mounted under a dashboard keeps its own tag.
    pub fn decorate(&mut self, decorator: &Decorator) {
        match decorator {
            Decorator::RequireAuth => self.requires_auth = true,
            Decorator::RequirePerms(perms) => {
                self.required_perms.extend(perms.iter().cloned());
            }
            Decorator::CurrentDashboard(slug) => {
                self.dashboard.get_or_insert_with(|| slug.clone());
            }
            Decorator::CurrentPanel(slug) => {
                self.panel.get_or_insert_with(|| slug.clone());
            }
        }
    }

    pub fn requires_auth(&self) -> bool {
        self.requires_auth
    }

    pub fn required_perms(&self) -> &BTreeSet<String> {
        &self.required_perms
    }

    pub fn dashboard(&self) -> Option<&str> {
        self.dashboard.as_deref()
    }

    pub fn panel(&self) -> Option<&str> {
        self.panel.as_deref()
    }

    /// Run the gates, tag the request and invoke the view.
    pub fn call(&self, request: &mut RequestContext) -> Result<ViewResponse, AccessError> {
        let authenticated = request.user.as_ref().is_some_and(|user| user.authenticated);
        if self.requires_auth && !authenticated {
            return Err(AccessError::NotAuthenticated);
        }

        if !self.required_perms.is_empty() {
            let permitted = request
                .user
                .as_ref()
                .is_some_and(|user| user.authenticated && user.has_perms(&self.required_perms));
            if !permitted {
                return Err(AccessError::NotAuthorized(request.path.clone()));
            }
        }

        if let Some(dashboard) = &self.dashboard {
            request.dashboard = Some(dashboard.clone());
        }
        if let Some(panel) = &self.panel {
            request.panel = Some(panel.clone());
        }

        Ok((self.view)(request))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("requires_auth", &self.requires_auth)
            .field("required_perms", &self.required_perms)
            .field("dashboard", &self.dashboard)
            .field("panel", &self.panel)
            .finish_non_exhaustive()
    }
}
