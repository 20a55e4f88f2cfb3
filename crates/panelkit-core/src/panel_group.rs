//! Panel groups.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use panelkit_protocols::{Panel, PanelEntry, PanelGroupSpec};

use crate::dashboard::DashboardEntry;

/// Slug of the group holding loose panel slugs.
pub const DEFAULT_PANEL_GROUP: &str = "default";

/// Slug and name of the group synthesized for unclaimed panels.
pub const OTHER_PANEL_GROUP: &str = "other";
pub const OTHER_PANEL_GROUP_NAME: &str = "Other";

/// An ordered, named set of panel slugs inside one dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelGroup {
    pub slug: String,
    pub name: Option<String>,
    pub panels: Vec<String>,
}

impl PanelGroup {
    pub fn new(slug: impl Into<String>, name: Option<String>, panels: Vec<String>) -> Self {
        Self {
            slug: slug.into(),
            name,
            panels,
        }
    }

    /// The registered panels of this group, in group order.
    ///
    /// Slugs without a registered panel are skipped. The iterator borrows
    /// the group, so calling this again restarts it.
    pub fn iter<'a>(
        &'a self,
        dashboard: &'a DashboardEntry,
    ) -> impl Iterator<Item = Arc<dyn Panel>> + 'a {
        self.panels.iter().filter_map(move |slug| {
            let panel = dashboard.get_panel(slug);
            if panel.is_none() {
                debug!(
                    dashboard = dashboard.slug(),
                    group = %self.slug,
                    panel = %slug,
                    "Panel not registered, skipping"
                );
            }
            panel
        })
    }
}

impl From<&PanelGroupSpec> for PanelGroup {
    fn from(spec: &PanelGroupSpec) -> Self {
        Self::new(spec.slug.clone(), spec.name.clone(), spec.panels.clone())
    }
}

/// Normalize declared entries into ordered groups plus every declared slug.
///
/// Loose slugs form the `default` group, placed where the first loose slug
/// appears. A later group with an existing slug replaces the earlier one in
/// place. If no `default` group results, an empty one is put first.
pub(crate) fn normalize(entries: &[PanelEntry]) -> (Vec<PanelGroup>, Vec<String>) {
    let mut groups: Vec<PanelGroup> = Vec::new();
    let mut slugs = Vec::new();
    let mut loose: Option<usize> = None;

    for entry in entries {
        match entry {
            PanelEntry::Panel(slug) => {
                slugs.push(slug.clone());
                match loose {
                    Some(index) => groups[index].panels.push(slug.clone()),
                    None => {
                        loose = Some(upsert(
                            &mut groups,
                            PanelGroup::new(DEFAULT_PANEL_GROUP, None, vec![slug.clone()]),
                        ));
                    }
                }
            }
            PanelEntry::Group(spec) => {
                slugs.extend(spec.panels.iter().cloned());
                let index = upsert(&mut groups, PanelGroup::from(spec));
                if loose == Some(index) {
                    loose = None;
                }
            }
        }
    }

    if !groups.iter().any(|group| group.slug == DEFAULT_PANEL_GROUP) {
        groups.insert(0, PanelGroup::new(DEFAULT_PANEL_GROUP, None, Vec::new()));
    }

    (groups, slugs)
}

fn upsert(groups: &mut Vec<PanelGroup>, group: PanelGroup) -> usize {
    match groups.iter().position(|existing| existing.slug == group.slug) {
        Some(index) => {
            groups[index] = group;
            index
        }
        None => {
            groups.push(group);
            groups.len() - 1
        }
    }
}
