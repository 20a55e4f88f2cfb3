//! Snapshot-guarded module imports.

use tracing::debug;

use panelkit_protocols::RegistryError;

use crate::registry::{Registerable, Registry, RegistrySnapshot};
use crate::site::Site;

/// State that can be rolled back after a failed import.
pub(crate) trait Restorable {
    type Snapshot;

    fn snapshot(&self) -> Self::Snapshot;

    fn restore(&self, snapshot: Self::Snapshot);
}

impl<T: ?Sized + Registerable> Restorable for Registry<T> {
    type Snapshot = RegistrySnapshot<T>;

    fn snapshot(&self) -> Self::Snapshot {
        Registry::snapshot(self)
    }

    fn restore(&self, snapshot: Self::Snapshot) {
        Registry::restore(self, snapshot);
    }
}

/// Import `module`, restoring `target` if the import fails.
///
/// The failure is swallowed when `package` has no submodule `name`: the
/// component is not installed. Otherwise it propagates. Returns whether the
/// import succeeded.
pub(crate) fn attempt_import<R: Restorable>(
    site: &Site,
    target: &R,
    module: &str,
    package: &str,
    name: &str,
) -> Result<bool, RegistryError> {
    let snapshot = target.snapshot();
    match site.import_module(module) {
        Ok(()) => Ok(true),
        Err(err) => {
            target.restore(snapshot);
            if site.manifest().has_submodule(package, name) {
                Err(err)
            } else {
                debug!(module, "Module not installed, skipping");
                Ok(false)
            }
        }
    }
}
