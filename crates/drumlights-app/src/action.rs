//! App actions
//!
//! Actions produced by the App state machine for the runtime to execute.

use drumlights_proto::Command;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Open the device connection.
    Connect,

    /// Send a command to the device.
    Send(Command),
}
