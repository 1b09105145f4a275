//! Connection state machine for the device socket.
//!
//! This module implements the connection manager - owning the single
//! logical connection to the device, detecting loss and reconnecting.
//!
//! # Architecture: Action-Based State Machine
//!
//! - Methods accept time as parameter (no stored clock)
//! - Methods return `Vec<ConnectionAction>`
//! - Driver code executes actions (open socket, send frame, notify the UI)
//!
//! # State Machine
//!
//! ```text
//!                connect             transport open
//! ┌──────────────┐ ───> ┌────────────┐ ───────────> ┌───────────┐
//! │ Disconnected │      │ Connecting │              │ Connected │
//! └──────────────┘ <─── └────────────┘              └───────────┘
//!        ^     transport closed                           │
//!        └────────────────────────────────────────────────┘
//!                     transport closed (any reason)
//! ```
//!
//! Every close schedules exactly one reconnect after
//! [`ConnectionConfig::reconnect_delay`]. There is no retry cap and no
//! backoff: the device is a LAN box that gets power-cycled and roams Wi-Fi,
//! so the controller simply keeps trying.

use std::time::{Duration, Instant};

use drumlights_proto::{Command, StateNotification};
use tracing::{debug, info, warn};

use crate::{endpoint::Endpoint, error::ConnectionError};

/// Actions returned by the connection state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionAction {
    /// Open a transport to this URL. The driver reports the outcome through
    /// [`Connection::transport_opened`] or [`Connection::transport_closed`].
    Open {
        /// WebSocket URL
        url: String,
    },

    /// Transmit this text frame on the open transport
    SendText(String),

    /// Deliver this event to the layer above
    Emit(ConnectionEvent),
}

/// Events the connection manager delivers to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Transport became usable
    Opened,
    /// Transport terminated, for any reason
    Closed,
    /// Device reported its current mode
    Notification(StateNotification),
}

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No transport, possibly waiting for a reconnect
    Disconnected,
    /// Transport is being opened
    Connecting,
    /// Transport is open
    Connected,
}

/// Connection configuration
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Delay between a close and the next connection attempt
    pub reconnect_delay: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { reconnect_delay: Duration::from_millis(1000) }
    }
}

/// Connection state machine
///
/// Owns the connection state and the reconnect deadline. Nothing else may
/// change either.
#[derive(Debug, Clone)]
pub struct Connection {
    state: ConnectionState,
    config: ConnectionConfig,
    endpoint: Endpoint,
    /// When the next reconnect is due, if one is scheduled
    reconnect_at: Option<Instant>,
    connect_attempts: u64,
}

impl Connection {
    /// Create a connection in Disconnected state with no attempt scheduled.
    pub fn new(endpoint: Endpoint, config: ConnectionConfig) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            config,
            endpoint,
            reconnect_at: None,
            connect_attempts: 0,
        }
    }

    /// Get current state
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Endpoint this connection opens
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Configuration in use
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Number of times a transport open was requested
    pub fn connect_attempts(&self) -> u64 {
        self.connect_attempts
    }

    /// When the pending reconnect is due, if any.
    ///
    /// Drivers sleep until this instant and then call [`Self::tick`].
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.reconnect_at
    }

    /// Begin establishing the connection.
    ///
    /// A no-op while Connecting or Connected.
    pub fn connect(&mut self, _now: Instant) -> Vec<ConnectionAction> {
        if self.state != ConnectionState::Disconnected {
            debug!(state = ?self.state, "connect ignored");
            return vec![];
        }

        self.state = ConnectionState::Connecting;
        self.reconnect_at = None;
        self.connect_attempts += 1;
        info!(url = %self.endpoint, attempt = self.connect_attempts, "opening device socket");

        vec![ConnectionAction::Open { url: self.endpoint.url().to_string() }]
    }

    /// Transition to Connected (transport open).
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless Connecting. A stale open from a
    /// transport that was already given up on lands here.
    pub fn transport_opened(
        &mut self,
        _now: Instant,
    ) -> Result<Vec<ConnectionAction>, ConnectionError> {
        if self.state != ConnectionState::Connecting {
            return Err(ConnectionError::InvalidState {
                state: self.state,
                operation: "transport_opened".to_string(),
            });
        }

        self.state = ConnectionState::Connected;
        info!(url = %self.endpoint, "connection opened");

        Ok(vec![ConnectionAction::Emit(ConnectionEvent::Opened)])
    }

    /// Transition to Disconnected and schedule one reconnect.
    ///
    /// Errors and orderly closes are handled the same way. Ignored when
    /// already Disconnected so a duplicate close cannot stack reconnects.
    pub fn transport_closed(&mut self, now: Instant) -> Vec<ConnectionAction> {
        if self.state == ConnectionState::Disconnected {
            debug!("close ignored, already disconnected");
            return vec![];
        }

        self.state = ConnectionState::Disconnected;
        self.reconnect_at = Some(now + self.config.reconnect_delay);
        info!(delay = ?self.config.reconnect_delay, "connection closed, reconnect scheduled");

        vec![ConnectionAction::Emit(ConnectionEvent::Closed)]
    }

    /// Fire the reconnect once its deadline has passed.
    pub fn tick(&mut self, now: Instant) -> Vec<ConnectionAction> {
        match self.reconnect_at {
            Some(due) if self.state == ConnectionState::Disconnected && now >= due => {
                self.connect(now)
            },
            _ => vec![],
        }
    }

    /// Serialize and transmit a command.
    ///
    /// Dropped with a warning unless Connected. Nothing is queued: the UI
    /// stays on its last confirmed state because no notification follows.
    pub fn send(&mut self, command: &Command) -> Vec<ConnectionAction> {
        if self.state != ConnectionState::Connected {
            warn!(mode = %command.mode, state = ?self.state, "send dropped, not connected");
            return vec![];
        }

        match command.encode() {
            Ok(text) => {
                debug!(mode = %command.mode, "sending command");
                vec![ConnectionAction::SendText(text)]
            },
            Err(err) => {
                warn!(%err, "failed to encode command");
                vec![]
            },
        }
    }

    /// Handle an inbound text frame.
    ///
    /// Malformed frames are logged and dropped; the state is unaffected.
    pub fn receive(&mut self, raw: &str) -> Vec<ConnectionAction> {
        if self.state != ConnectionState::Connected {
            debug!(state = ?self.state, "frame dropped, not connected");
            return vec![];
        }

        match StateNotification::decode(raw) {
            Ok(notification) => {
                debug!(mode = %notification.mode, "state notification");
                vec![ConnectionAction::Emit(ConnectionEvent::Notification(notification))]
            },
            Err(err) => {
                warn!(%err, frame = raw, "dropping malformed frame");
                vec![]
            },
        }
    }
}
