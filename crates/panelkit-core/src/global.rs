//! Process-wide site handle.
//!
//! Code that cannot receive the site explicitly reads it from here. The
//! handle is installed once at startup and cleared with [`reset`] in tests.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::site::Site;

static SITE: Lazy<RwLock<Option<Arc<Site>>>> = Lazy::new(|| RwLock::new(None));

/// Install `site` as the process-wide site, replacing any previous one.
pub fn install(site: Site) -> Arc<Site> {
    let site = Arc::new(site);
    *SITE.write() = Some(site.clone());
    site
}

/// The installed site, if any.
pub fn site() -> Option<Arc<Site>> {
    SITE.read().clone()
}

pub fn reset() {
    *SITE.write() = None;
}
