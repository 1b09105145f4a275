//! UI state synchronizer.
//!
//! [`App`] translates in both directions between the device protocol and
//! the control layout. Inbound, a notified mode becomes exactly one active
//! control per grouping (plus its tab). Outbound, an activated control
//! becomes a [`Command`], gated by a confirmation for the sentinel mode.
//!
//! Sending a command does not change highlights. The device is the only
//! authority, so the UI moves when the device says it has moved, unless
//! [`HighlightPolicy::Optimistic`] is configured.

use drumlights_proto::{Command, ModeId};
use tracing::{debug, info, warn};

use crate::{
    AppAction, AppEvent,
    layout::{ControlId, Layout, PaneId, TabId},
    state::Highlights,
};

/// How the sentinel mode is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SentinelPolicy {
    /// Ask the user first; only an explicit yes sends.
    #[default]
    Confirm,
    /// Send like any other mode.
    Direct,
}

/// When a requested mode is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightPolicy {
    /// Wait for the device to announce the mode.
    #[default]
    Deferred,
    /// Highlight immediately when the command is sent.
    Optimistic,
}

/// Synchronizer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncConfig {
    /// Sentinel handling.
    pub sentinel: SentinelPolicy,
    /// Highlight timing.
    pub highlight: HighlightPolicy,
}

/// Application state.
#[derive(Debug, Clone)]
pub struct App {
    layout: Layout,
    config: SyncConfig,
    highlights: Highlights,
    overlay_visible: bool,
    pending_confirmation: Option<ModeId>,
    device_mode: Option<ModeId>,
    status: Option<String>,
}

impl App {
    /// Create the app. The overlay starts visible: nothing is connected yet.
    pub fn new(layout: Layout, config: SyncConfig) -> Self {
        Self {
            layout,
            config,
            highlights: Highlights::default(),
            overlay_visible: true,
            pending_confirmation: None,
            device_mode: None,
            status: None,
        }
    }

    /// Control layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Configuration.
    pub fn config(&self) -> SyncConfig {
        self.config
    }

    /// Current highlights.
    pub fn highlights(&self) -> &Highlights {
        &self.highlights
    }

    /// Whether the connectivity overlay is shown.
    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    /// Mode waiting for the user's confirmation.
    pub fn pending_confirmation(&self) -> Option<ModeId> {
        self.pending_confirmation
    }

    /// Last mode the device announced.
    pub fn device_mode(&self) -> Option<ModeId> {
        self.device_mode
    }

    /// Status line text.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Pane shown for the active tab.
    pub fn visible_pane(&self) -> Option<PaneId> {
        self.highlights.active_tab().and_then(|tab| self.layout.pane_for_tab(tab))
    }

    /// Toolbar controls followed by the visible pane's controls.
    pub fn visible_controls(&self) -> Vec<ControlId> {
        let mut visible: Vec<ControlId> = self.layout.toolbar().map(|c| c.id).collect();
        if let Some(pane) = self.visible_pane() {
            visible.extend(self.layout.controls_in_pane(pane).map(|c| c.id));
        }
        visible
    }

    /// Process an event and return actions for the runtime.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::ControlActivated(id) => {
                if self.input_blocked() {
                    return vec![];
                }
                self.activate_control(id)
            },
            AppEvent::ModeRequested(mode) => {
                if self.input_blocked() {
                    return vec![];
                }
                self.request_mode(mode)
            },
            AppEvent::ConfirmationResolved(confirmed) => self.resolve_confirmation(confirmed),
            AppEvent::TabSelected(tab) => {
                if self.layout.tab(tab).is_some() {
                    self.highlights.set_tab(Some(tab));
                }
                vec![AppAction::Render]
            },
            AppEvent::NextTab => {
                self.step_tab(true);
                vec![AppAction::Render]
            },
            AppEvent::PrevTab => {
                self.step_tab(false);
                vec![AppAction::Render]
            },
            AppEvent::ConnectionOpened => {
                self.overlay_visible = false;
                self.status = Some("Connected".to_string());
                vec![AppAction::Render]
            },
            AppEvent::ConnectionClosed => {
                self.overlay_visible = true;
                if self.pending_confirmation.take().is_some() {
                    info!("confirmation cancelled by disconnect");
                }
                self.status = Some("Connection lost, reconnecting".to_string());
                vec![AppAction::Render]
            },
            AppEvent::StateNotified(notification) => {
                self.device_mode = Some(notification.mode);
                self.apply_state_notification(notification.mode);
                vec![AppAction::Render]
            },
            AppEvent::Quit => vec![AppAction::Quit],
        }
    }

    /// Reflect the device's mode in the highlights.
    ///
    /// Clears every active control first. Mode 0 also closes the active
    /// tab. A mode no control is configured for leaves nothing active and
    /// the tab untouched.
    pub fn apply_state_notification(&mut self, mode: ModeId) {
        self.highlights.clear_controls();

        if mode.is_off() {
            self.highlights.set_tab(None);
            return;
        }

        let matches = self.layout.controls_for_mode(mode);
        if matches.is_empty() {
            debug!(%mode, "no control for mode");
            return;
        }

        let mut tab: Option<TabId> = None;
        for &id in matches {
            let Some(control) = self.layout.control(id) else { continue };
            self.highlights.activate(control.group, id);
            if tab.is_none() {
                tab = control.pane.and_then(|pane| self.layout.tab_for_pane(pane));
            }
        }
        if tab.is_some() {
            self.highlights.set_tab(tab);
        }
    }

    /// User activated `id`.
    pub fn activate_control(&mut self, id: ControlId) -> Vec<AppAction> {
        let Some(control) = self.layout.control(id) else {
            warn!(?id, "activation of unknown control");
            return vec![];
        };
        let Some(mode) = control.mode else {
            debug!(label = %control.label, "control has no mode");
            return vec![];
        };
        self.request_mode(mode)
    }

    /// User asked for `mode`.
    pub fn request_mode(&mut self, mode: ModeId) -> Vec<AppAction> {
        if mode.is_sentinel() && self.config.sentinel == SentinelPolicy::Confirm {
            info!(%mode, "awaiting confirmation");
            self.pending_confirmation = Some(mode);
            return vec![AppAction::Render];
        }
        self.dispatch(mode)
    }

    /// User answered the confirmation prompt.
    pub fn resolve_confirmation(&mut self, confirmed: bool) -> Vec<AppAction> {
        let Some(mode) = self.pending_confirmation.take() else {
            debug!("no confirmation pending");
            return vec![];
        };
        if !confirmed {
            info!(%mode, "confirmation declined");
            return vec![AppAction::Render];
        }
        self.dispatch(mode)
    }

    fn dispatch(&mut self, mode: ModeId) -> Vec<AppAction> {
        self.status = Some(format!("Requested mode {mode}"));
        let mut actions = vec![AppAction::Send(Command::new(mode))];
        if self.config.highlight == HighlightPolicy::Optimistic {
            self.apply_state_notification(mode);
        }
        actions.push(AppAction::Render);
        actions
    }

    /// The overlay and the confirmation prompt both block control input.
    fn input_blocked(&self) -> bool {
        if self.overlay_visible {
            debug!("input blocked while disconnected");
            return true;
        }
        self.pending_confirmation.is_some()
    }

    fn step_tab(&mut self, forward: bool) {
        let count = self.layout.tabs().len();
        if count == 0 {
            return;
        }
        let next = match (self.highlights.active_tab(), forward) {
            (Some(tab), true) => (tab.index() + 1) % count,
            (Some(tab), false) => (tab.index() + count - 1) % count,
            (None, true) => 0,
            (None, false) => count - 1,
        };
        let tab = self.layout.tabs()[next].id;
        self.highlights.set_tab(Some(tab));
    }
}
