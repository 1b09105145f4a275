//! Static control layout.
//!
//! A [`Layout`] is the controller's equivalent of the page markup: tabs,
//! the panes they label, groupings, and the controls with their modes. It is
//! built once at startup and never mutated. Building it also builds the
//! mode to control map that notifications are resolved through, so the
//! mapping can be checked without any rendering surface.
//!
//! ```text
//!  Tab ──labels──> Pane ──contains──> Control ──member of──> Group
//!                                        │
//!                                        └── mode (0 or 1)
//! ```

use std::collections::{BTreeMap, HashMap};

use drumlights_proto::ModeId;
use thiserror::Error;

/// Index of a control in its layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(usize);

/// Index of a tab in its layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(usize);

/// Index of a pane in its layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneId(usize);

/// Index of a grouping in its layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(usize);

impl ControlId {
    /// Position in [`Layout::controls`].
    pub fn index(self) -> usize {
        self.0
    }
}

impl TabId {
    /// Position in [`Layout::tabs`].
    pub fn index(self) -> usize {
        self.0
    }
}

/// A tab header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    /// Tab id.
    pub id: TabId,
    /// Text shown on the tab.
    pub label: String,
}

/// A pane, shown while the tab that labels it is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pane {
    /// Pane id.
    pub id: PaneId,
    /// Tab this pane is described by.
    pub labelled_by: TabId,
}

/// A grouping. At most one of its controls is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Group id.
    pub id: GroupId,
    /// Name, for diagnostics.
    pub name: String,
}

/// A mode control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    /// Control id.
    pub id: ControlId,
    /// Text shown on the control.
    pub label: String,
    /// Mode this control requests, if any.
    pub mode: Option<ModeId>,
    /// Grouping the active marker is exclusive within.
    pub group: GroupId,
    /// Pane the control lives in. `None` means always visible.
    pub pane: Option<PaneId>,
}

/// Layout validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Two controls of one grouping request the same mode.
    #[error("mode {mode} appears twice in group {group:?}")]
    DuplicateMode {
        /// Repeated mode.
        mode: ModeId,
        /// Group name.
        group: String,
    },

    /// A control references a grouping that does not exist.
    #[error("control {control:?} references an unknown group")]
    UnknownGroup {
        /// Control label.
        control: String,
    },

    /// A control references a pane that does not exist.
    #[error("control {control:?} references an unknown pane")]
    UnknownPane {
        /// Control label.
        control: String,
    },

    /// A pane is labelled by a tab that does not exist.
    #[error("pane {pane} is labelled by an unknown tab")]
    UnknownTab {
        /// Pane index.
        pane: usize,
    },

    /// A tab labels more than one pane.
    #[error("tab {tab:?} labels more than one pane")]
    TabLabelsManyPanes {
        /// Tab label.
        tab: String,
    },
}

/// Validated, immutable control layout.
#[derive(Debug, Clone)]
pub struct Layout {
    groups: Vec<Group>,
    tabs: Vec<Tab>,
    panes: Vec<Pane>,
    controls: Vec<Control>,
    by_mode: HashMap<ModeId, Vec<ControlId>>,
    pane_for_tab: HashMap<TabId, PaneId>,
}

impl Layout {
    /// Start building a layout.
    pub fn builder() -> LayoutBuilder {
        LayoutBuilder::default()
    }

    /// The Drum Lights catalog: a toolbar with Off and Auto, and four tabs
    /// of modes, all in one grouping.
    pub fn drum_lights() -> Result<Self, LayoutError> {
        const COLOURS: [&str; 7] = ["Green", "Gold", "Blue", "Red", "White", "Cyan", "Magenta"];

        let mut b = Self::builder();
        let modes = b.group("modes");

        b.control("Off", ModeId::OFF, modes, None);
        b.control("Auto", ModeId::AUTO, modes, None);

        let solid = b.tab_with_pane("Solid");
        for (i, colour) in COLOURS.iter().enumerate() {
            // Solid 7 is purple on the receiver, not magenta
            let label = if i == 6 { "Purple" } else { *colour };
            b.control(label, ModeId::new(1 + i as i32), modes, Some(solid));
        }

        let chase = b.tab_with_pane("Chase");
        for (i, colour) in COLOURS.iter().enumerate() {
            b.control(*colour, ModeId::new(11 + i as i32), modes, Some(chase));
        }

        let twinkle = b.tab_with_pane("Twinkle");
        for (i, colour) in COLOURS.iter().enumerate() {
            b.control(*colour, ModeId::new(81 + i as i32), modes, Some(twinkle));
        }

        let special = b.tab_with_pane("Special");
        for (label, mode) in [
            ("Rio Spin", 91),
            ("Rio Disco", 92),
            ("Rio Flag", 93),
            ("Hazards", 97),
            ("Strobe", 98),
            ("Rainbow", 99),
            ("999 Blue Strobes", 199),
        ] {
            b.control(label, ModeId::new(mode), modes, Some(special));
        }

        b.build()
    }

    /// All controls, indexed by [`ControlId::index`].
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// Control by id.
    pub fn control(&self, id: ControlId) -> Option<&Control> {
        self.controls.get(id.0)
    }

    /// All tabs, in display order.
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Tab by id.
    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.get(id.0)
    }

    /// All groupings.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Pane by id.
    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.panes.get(id.0)
    }

    /// Pane labelled by `tab`, if it has one.
    pub fn pane_for_tab(&self, tab: TabId) -> Option<PaneId> {
        self.pane_for_tab.get(&tab).copied()
    }

    /// Tab that labels `pane`.
    pub fn tab_for_pane(&self, pane: PaneId) -> Option<TabId> {
        self.pane(pane).map(|p| p.labelled_by)
    }

    /// Controls configured for `mode`, at most one per grouping.
    pub fn controls_for_mode(&self, mode: ModeId) -> &[ControlId] {
        self.by_mode.get(&mode).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Controls that live in `pane`, in layout order.
    pub fn controls_in_pane(&self, pane: PaneId) -> impl Iterator<Item = &Control> {
        self.controls.iter().filter(move |c| c.pane == Some(pane))
    }

    /// Controls outside every pane, always visible.
    pub fn toolbar(&self) -> impl Iterator<Item = &Control> {
        self.controls.iter().filter(|c| c.pane.is_none())
    }

    /// Tab whose label matches `label`, ignoring case.
    pub fn find_tab(&self, label: &str) -> Option<TabId> {
        self.tabs.iter().find(|t| t.label.eq_ignore_ascii_case(label)).map(|t| t.id)
    }

    /// Every mode some control is configured for.
    pub fn modes(&self) -> impl Iterator<Item = ModeId> + '_ {
        self.by_mode.keys().copied()
    }
}

/// Builder for [`Layout`]. Ids it hands out are only valid for the layout it
/// builds.
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    groups: Vec<Group>,
    tabs: Vec<Tab>,
    panes: Vec<Pane>,
    controls: Vec<Control>,
}

impl LayoutBuilder {
    /// Add a grouping.
    pub fn group(&mut self, name: impl Into<String>) -> GroupId {
        let id = GroupId(self.groups.len());
        self.groups.push(Group { id, name: name.into() });
        id
    }

    /// Add a tab without a pane.
    pub fn tab(&mut self, label: impl Into<String>) -> TabId {
        let id = TabId(self.tabs.len());
        self.tabs.push(Tab { id, label: label.into() });
        id
    }

    /// Add a pane labelled by `tab`.
    pub fn pane(&mut self, labelled_by: TabId) -> PaneId {
        let id = PaneId(self.panes.len());
        self.panes.push(Pane { id, labelled_by });
        id
    }

    /// Add a tab and the pane it labels.
    pub fn tab_with_pane(&mut self, label: impl Into<String>) -> PaneId {
        let tab = self.tab(label);
        self.pane(tab)
    }

    /// Add a control.
    pub fn control(
        &mut self,
        label: impl Into<String>,
        mode: impl Into<Option<ModeId>>,
        group: GroupId,
        pane: Option<PaneId>,
    ) -> ControlId {
        let id = ControlId(self.controls.len());
        self.controls.push(Control { id, label: label.into(), mode: mode.into(), group, pane });
        id
    }

    /// Validate and freeze the layout.
    pub fn build(self) -> Result<Layout, LayoutError> {
        let mut pane_for_tab = HashMap::new();
        for pane in &self.panes {
            let Some(tab) = self.tabs.get(pane.labelled_by.0) else {
                return Err(LayoutError::UnknownTab { pane: pane.id.0 });
            };
            if pane_for_tab.insert(pane.labelled_by, pane.id).is_some() {
                return Err(LayoutError::TabLabelsManyPanes { tab: tab.label.clone() });
            }
        }

        let mut by_mode: HashMap<ModeId, Vec<ControlId>> = HashMap::new();
        let mut seen: BTreeMap<(GroupId, ModeId), ControlId> = BTreeMap::new();
        for control in &self.controls {
            let Some(group) = self.groups.get(control.group.0) else {
                return Err(LayoutError::UnknownGroup { control: control.label.clone() });
            };
            if control.pane.is_some_and(|p| p.0 >= self.panes.len()) {
                return Err(LayoutError::UnknownPane { control: control.label.clone() });
            }
            let Some(mode) = control.mode else { continue };
            if seen.insert((control.group, mode), control.id).is_some() {
                return Err(LayoutError::DuplicateMode { mode, group: group.name.clone() });
            }
            by_mode.entry(mode).or_default().push(control.id);
        }

        Ok(Layout {
            groups: self.groups,
            tabs: self.tabs,
            panes: self.panes,
            controls: self.controls,
            by_mode,
            pane_for_tab,
        })
    }
}
