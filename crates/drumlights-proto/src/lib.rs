//! Wire format for the Drum Lights controller.
//!
//! Every frame on the socket is a UTF-8 text frame holding a single JSON
//! object `{"mode": <integer>}`. The same shape travels in both directions:
//! a [`Command`] is what the controller asks for, a [`StateNotification`] is
//! what the device says it is now doing. Only the path a frame arrived on
//! tells them apart, so they are distinct types here.
//!
//! There is no framing, versioning or multiplexing beyond that.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod errors;
pub mod message;
pub mod mode;

pub use errors::{ProtocolError, Result};
pub use message::{Command, StateNotification};
pub use mode::ModeId;
