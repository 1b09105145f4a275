//! Terminal UI for Drum Lights
//!
//! A thin shell over [`drumlights_app::Driver`] that provides terminal and
//! WebSocket I/O. All orchestration logic lives in the generic
//! [`drumlights_app::Runtime`]

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod commands;
pub mod input;
pub mod terminal;
pub mod ui;

pub use commands::Command;
pub use drumlights_app::{App, AppAction, AppEvent, Bridge, Driver, Runtime};
pub use input::{InputState, KeyInput};
pub use terminal::{TerminalDriver, TerminalError};
