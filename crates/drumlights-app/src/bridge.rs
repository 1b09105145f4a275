//! Connection bridge
//!
//! Connects the [`App`](crate::App) to the [`Connection`] state machine.
//! App actions that need the network become connection work, and
//! connection events become app events. The bridge owns the connection so
//! the runtime never touches connection state directly.

use std::time::Instant;

use drumlights_core::{Connection, ConnectionAction, ConnectionEvent};
use tracing::{debug, warn};

use crate::{AppAction, AppEvent};

/// Bridge between the App and the device connection.
#[derive(Debug)]
pub struct Bridge {
    connection: Connection,
}

impl Bridge {
    /// Wrap a connection.
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// The wrapped connection.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Translate an App action into connection work.
    ///
    /// Render and Quit are not the bridge's concern and produce nothing.
    pub fn handle_app_action(&mut self, action: &AppAction, now: Instant) -> Vec<ConnectionAction> {
        match action {
            AppAction::Connect => self.connection.connect(now),
            AppAction::Send(command) => self.connection.send(command),
            AppAction::Render | AppAction::Quit => vec![],
        }
    }

    /// The driver finished opening a transport.
    ///
    /// An open the connection did not ask for is logged and ignored.
    pub fn transport_opened(&mut self, now: Instant) -> Vec<ConnectionAction> {
        match self.connection.transport_opened(now) {
            Ok(actions) => actions,
            Err(err) => {
                warn!(%err, "ignoring transport open");
                vec![]
            },
        }
    }

    /// The driver's transport went away.
    pub fn transport_closed(&mut self, now: Instant) -> Vec<ConnectionAction> {
        self.connection.transport_closed(now)
    }

    /// The driver received a text frame.
    pub fn receive(&mut self, raw: &str) -> Vec<ConnectionAction> {
        self.connection.receive(raw)
    }

    /// Advance timers.
    pub fn tick(&mut self, now: Instant) -> Vec<ConnectionAction> {
        self.connection.tick(now)
    }

    /// Next instant [`Self::tick`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.connection.next_deadline()
    }

    /// Map a connection event to the App event it causes.
    pub fn app_event(event: ConnectionEvent) -> AppEvent {
        debug!(?event, "connection event");
        match event {
            ConnectionEvent::Opened => AppEvent::ConnectionOpened,
            ConnectionEvent::Closed => AppEvent::ConnectionClosed,
            ConnectionEvent::Notification(notification) => AppEvent::StateNotified(notification),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use drumlights_core::{ConnectionConfig, ConnectionState, Endpoint};
    use drumlights_proto::{Command, ModeId, StateNotification};

    use super::*;

    fn bridge() -> Bridge {
        Bridge::new(Connection::new(Endpoint::from_url("ws://device/ws"), ConnectionConfig::default()))
    }

    #[test]
    fn connect_action_opens_socket() {
        let t0 = Instant::now();
        let mut bridge = bridge();

        let actions = bridge.handle_app_action(&AppAction::Connect, t0);
        assert_eq!(actions, vec![ConnectionAction::Open { url: "ws://device/ws".into() }]);
    }

    #[test]
    fn render_and_quit_produce_no_work() {
        let t0 = Instant::now();
        let mut bridge = bridge();
        assert!(bridge.handle_app_action(&AppAction::Render, t0).is_empty());
        assert!(bridge.handle_app_action(&AppAction::Quit, t0).is_empty());
    }

    #[test]
    fn send_requires_open_transport() {
        let t0 = Instant::now();
        let mut bridge = bridge();
        let send = AppAction::Send(Command::new(ModeId::new(7)));

        assert!(bridge.handle_app_action(&send, t0).is_empty());

        bridge.handle_app_action(&AppAction::Connect, t0);
        bridge.transport_opened(t0);
        assert_eq!(bridge.handle_app_action(&send, t0), vec![ConnectionAction::SendText(
            r#"{"mode":7}"#.into()
        )]);
    }

    #[test]
    fn unexpected_open_is_ignored() {
        let t0 = Instant::now();
        let mut bridge = bridge();
        assert!(bridge.transport_opened(t0).is_empty());
        assert_eq!(bridge.connection().state(), ConnectionState::Disconnected);
    }

    #[test]
    fn close_then_tick_reconnects() {
        let t0 = Instant::now();
        let mut bridge = bridge();
        bridge.handle_app_action(&AppAction::Connect, t0);
        bridge.transport_closed(t0);

        let due = bridge.next_deadline().unwrap();
        assert_eq!(due, t0 + Duration::from_secs(1));
        assert!(matches!(bridge.tick(due).as_slice(), [ConnectionAction::Open { .. }]));
    }

    #[test]
    fn connection_events_map_to_app_events() {
        let n = StateNotification::new(ModeId::new(4));
        assert_eq!(Bridge::app_event(ConnectionEvent::Opened), AppEvent::ConnectionOpened);
        assert_eq!(Bridge::app_event(ConnectionEvent::Closed), AppEvent::ConnectionClosed);
        assert_eq!(Bridge::app_event(ConnectionEvent::Notification(n)), AppEvent::StateNotified(n));
    }
}
