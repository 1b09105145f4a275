//! Connection error types.

use thiserror::Error;

use crate::connection::ConnectionState;

/// Errors raised by the connection state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// A transition was requested from a state that does not allow it.
    #[error("cannot {operation} while {state:?}")]
    InvalidState {
        /// State the connection was in.
        state: ConnectionState,
        /// Operation that was attempted.
        operation: String,
    },

    /// The host the endpoint is derived from is unusable.
    #[error("invalid device host {host:?}")]
    InvalidHost {
        /// Rejected host string.
        host: String,
    },
}
