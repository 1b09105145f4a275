//! Drum Lights controller core logic
//!
//! Pure state machine logic for the controller's connection to the device,
//! completely decoupled from I/O.
//!
//! # Architecture
//!
//! The connection manager is a deterministic state machine isolated from
//! sockets, timers and scheduling. Time is supplied explicitly by the caller
//! and every transition returns declarative [`connection::ConnectionAction`]s
//! describing what should happen next (open a socket, send a frame, tell the
//! UI layer). A runtime or test harness interprets them.
//!
//! # Components
//!
//! - [`connection`]: Connection state machine (connect, close, reconnect)
//! - [`endpoint`]: Build-mode dependent socket endpoint resolution
//! - [`error`]: Connection error types

pub mod connection;
pub mod endpoint;
pub mod error;

pub use connection::{
    Connection, ConnectionAction, ConnectionConfig, ConnectionEvent, ConnectionState,
};
pub use endpoint::{BuildMode, Endpoint};
pub use error::ConnectionError;
