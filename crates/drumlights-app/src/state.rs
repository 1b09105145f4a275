//! Highlight state.

use std::collections::BTreeMap;

use crate::layout::{ControlId, GroupId, TabId};

/// Which controls and which tab are marked active.
///
/// Keyed by grouping, so a grouping can never hold two active controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlights {
    active: BTreeMap<GroupId, ControlId>,
    active_tab: Option<TabId>,
}

impl Highlights {
    /// Whether `control` is marked active.
    pub fn is_active(&self, control: ControlId) -> bool {
        self.active.values().any(|&c| c == control)
    }

    /// Active control of `group`.
    pub fn active_in(&self, group: GroupId) -> Option<ControlId> {
        self.active.get(&group).copied()
    }

    /// All active controls, ordered by grouping.
    pub fn active_controls(&self) -> impl Iterator<Item = ControlId> + '_ {
        self.active.values().copied()
    }

    /// Active tab. Its pane is the visible one.
    pub fn active_tab(&self) -> Option<TabId> {
        self.active_tab
    }

    pub(crate) fn clear_controls(&mut self) {
        self.active.clear();
    }

    /// Mark `control` active, replacing whatever was active in `group`.
    pub(crate) fn activate(&mut self, group: GroupId, control: ControlId) {
        self.active.insert(group, control);
    }

    pub(crate) fn set_tab(&mut self, tab: Option<TabId>) {
        self.active_tab = tab;
    }
}
