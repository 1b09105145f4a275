//! Application layer for the Drum Lights controller
//!
//! Pure state machines and a generic runtime for UI and connection
//! orchestration, so deterministic simulation runs the same code as the
//! terminal frontend.
//!
//! # Components
//!
//! - [`App`]: UI state synchronizer (highlights, overlay, confirmation)
//! - [`Layout`]: Static control catalog and the mode to control map
//! - [`Bridge`]: Connection bridge (translates App actions to connection work)
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic dispatch loop using Driver

mod action;
mod app;
mod bridge;
mod driver;
mod event;
pub mod layout;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::{App, HighlightPolicy, SentinelPolicy, SyncConfig};
pub use bridge::Bridge;
pub use driver::{Driver, DriverEvent};
pub use event::AppEvent;
pub use layout::{Control, ControlId, GroupId, Layout, LayoutBuilder, LayoutError, PaneId, TabId};
pub use runtime::Runtime;
pub use state::Highlights;
