//! Access context handed to `allowed` checks and navigation predicates.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// The user a request or navigation pass is evaluated for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub permissions: BTreeSet<String>,
    /// Session token; access results are cached per token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl User {
    /// A signed-in user without permissions.
    pub fn authenticated(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            authenticated: true,
            ..Default::default()
        }
    }

    /// A user that has not signed in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions.extend(permissions.into_iter().map(Into::into));
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Whether the user holds every listed permission.
    pub fn has_perms<'a, I>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        required
            .into_iter()
            .all(|permission| self.permissions.contains(permission))
    }
}

/// Host-supplied policy predicate over a rule set.
pub trait PolicyEvaluator: Send + Sync {
    fn evaluate(&self, rules: &[String], ctx: &AccessContext) -> bool;
}

impl<F> PolicyEvaluator for F
where
    F: Fn(&[String], &AccessContext) -> bool + Send + Sync,
{
    fn evaluate(&self, rules: &[String], ctx: &AccessContext) -> bool {
        self(rules, ctx)
    }
}

/// Context for access and navigation checks.
#[derive(Clone, Default)]
pub struct AccessContext {
    user: Option<User>,
    policy: Option<Arc<dyn PolicyEvaluator>>,
    cache: Option<Arc<AccessCache>>,
}

impl AccessContext {
    pub fn new(user: Option<User>) -> Self {
        Self {
            user,
            policy: None,
            cache: None,
        }
    }

    pub fn anonymous() -> Self {
        Self::new(None)
    }

    pub fn for_user(user: User) -> Self {
        Self::new(Some(user))
    }

    pub fn with_policy(mut self, policy: Arc<dyn PolicyEvaluator>) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn with_cache(mut self, cache: Arc<AccessCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.authenticated)
    }

    /// Evaluate a component's rule set.
    ///
    /// Without an evaluator, or with an empty rule set, everything is
    /// allowed. Otherwise the check passes when any single rule passes.
    pub fn check_rules(&self, rules: &[String]) -> bool {
        match &self.policy {
            Some(policy) if !rules.is_empty() => rules
                .iter()
                .any(|rule| policy.evaluate(std::slice::from_ref(rule), self)),
            _ => true,
        }
    }

    /// Return the cached result for `key`, computing it on a miss.
    pub fn cached(&self, key: &str, compute: impl FnOnce() -> bool) -> bool {
        match &self.cache {
            Some(cache) => {
                let token = self.user.as_ref().and_then(|user| user.token.as_deref());
                cache.get_or_compute(token, key, compute)
            }
            None => compute(),
        }
    }
}

impl fmt::Debug for AccessContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessContext")
            .field("user", &self.user)
            .field("policy", &self.policy.is_some())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

/// Per-session memo of access results.
///
/// Entries are valid for one session token; a different token clears them.
#[derive(Debug, Default)]
pub struct AccessCache {
    state: Mutex<CacheState>,
}

#[derive(Debug, Default)]
struct CacheState {
    valid_for: Option<String>,
    allowed: HashMap<String, bool>,
}

impl AccessCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(
        &self,
        token: Option<&str>,
        key: &str,
        compute: impl FnOnce() -> bool,
    ) -> bool {
        {
            let mut state = self.state.lock();
            if state.valid_for.as_deref() != token {
                state.valid_for = token.map(str::to_string);
                state.allowed.clear();
            }
            if let Some(allowed) = state.allowed.get(key) {
                return *allowed;
            }
        }

        // The lock is released while computing: dashboard checks recurse
        // into panel checks through the same cache.
        let allowed = compute();

        let mut state = self.state.lock();
        if state.valid_for.as_deref() == token {
            state.allowed.insert(key.to_string(), allowed);
        }
        allowed
    }

    pub fn len(&self) -> usize {
        self.state.lock().allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "access_tests.rs"]
mod tests;
