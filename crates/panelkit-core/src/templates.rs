//! Template directories published by registered panels.

use std::path::{Path, PathBuf};

use dashmap::DashMap;

/// Map of `(dashboard, panel)` to a template search path.
#[derive(Debug, Default)]
pub struct TemplateDirectories {
    dirs: DashMap<(String, String), PathBuf>,
}

impl TemplateDirectories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `dir` for a panel. Directories that do not exist are ignored.
    pub fn publish(&self, dashboard: &str, panel: &str, dir: &Path) -> bool {
        if !dir.is_dir() {
            return false;
        }
        self.dirs
            .insert((dashboard.to_string(), panel.to_string()), dir.to_path_buf());
        true
    }

    pub fn remove(&self, dashboard: &str, panel: &str) -> Option<PathBuf> {
        self.dirs
            .remove(&(dashboard.to_string(), panel.to_string()))
            .map(|(_, dir)| dir)
    }

    pub fn get(&self, dashboard: &str, panel: &str) -> Option<PathBuf> {
        self.dirs
            .get(&(dashboard.to_string(), panel.to_string()))
            .map(|dir| dir.clone())
    }

    /// All entries keyed `dashboard/panel`, sorted by key.
    pub fn entries(&self) -> Vec<(String, PathBuf)> {
        let mut entries: Vec<(String, PathBuf)> = self
            .dirs
            .iter()
            .map(|entry| {
                let (dashboard, panel) = entry.key();
                (format!("{dashboard}/{panel}"), entry.value().clone())
            })
            .collect();
        entries.sort();
        entries
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_publish_existing_dir() {
        let temp = TempDir::new().unwrap();
        let dirs = TemplateDirectories::new();

        assert!(dirs.publish("project", "instances", temp.path()));
        assert_eq!(dirs.get("project", "instances").as_deref(), Some(temp.path()));
        assert_eq!(dirs.entries()[0].0, "project/instances");
    }

    #[test]
    fn test_publish_missing_dir_is_ignored() {
        let temp = TempDir::new().unwrap();
        let dirs = TemplateDirectories::new();

        assert!(!dirs.publish("project", "instances", &temp.path().join("templates")));
        assert!(dirs.is_empty());
    }

    #[test]
    fn test_remove() {
        let temp = TempDir::new().unwrap();
        let dirs = TemplateDirectories::new();
        dirs.publish("project", "instances", temp.path());

        assert!(dirs.remove("project", "instances").is_some());
        assert!(dirs.remove("project", "instances").is_none());
        assert_eq!(dirs.len(), 0);
    }
}
