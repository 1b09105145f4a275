//! App events
//!
//! Everything the App state machine reacts to: user input from the
//! frontend and connection events translated by the [`crate::Bridge`].

use drumlights_proto::{ModeId, StateNotification};

use crate::layout::{ControlId, TabId};

/// Events consumed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// User activated a control.
    ControlActivated(ControlId),

    /// User asked for a mode directly, without a control.
    ModeRequested(ModeId),

    /// User answered the confirmation prompt.
    ConfirmationResolved(bool),

    /// User switched to a tab.
    TabSelected(TabId),

    /// User moved to the next tab.
    NextTab,

    /// User moved to the previous tab.
    PrevTab,

    /// The device connection opened.
    ConnectionOpened,

    /// The device connection closed.
    ConnectionClosed,

    /// The device reported its mode.
    StateNotified(StateNotification),

    /// User asked to quit.
    Quit,
}
