//! Scripted simulation driver.
//!
//! [`SimDriver`] implements [`Driver`] over a timed script. Time only moves
//! when the runtime polls and nothing is pending: the clock then jumps to the
//! earliest of the next script step, the runtime's reconnect deadline and
//! the device's auto deadline. The socket is an in-memory link to a
//! [`SimDevice`].

use std::{
    collections::VecDeque,
    future::Future,
    time::{Duration, Instant},
};

use drumlights_app::{App, AppEvent, ControlId, Driver, DriverEvent, TabId};
use drumlights_proto::{Command, ModeId, ProtocolError, StateNotification};
use thiserror::Error;
use tracing::{debug, trace};

use crate::{SimClock, SimDevice};

/// Simulation driver errors.
#[derive(Debug, Error)]
pub enum SimError {
    /// Send attempted with no link to the device.
    #[error("link to device is down")]
    LinkDown,

    /// A frame did not encode or decode.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// What a script step does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    /// User input.
    Input(AppEvent),
    /// The device changes mode on its own (another client, a button).
    DeviceMode(ModeId),
    /// The link drops. The device stays reachable.
    DropLink,
    /// The device becomes reachable or unreachable.
    DeviceOnline(bool),
    /// Record an [`Observation`] under this label.
    Checkpoint(String),
    /// User quits.
    Quit,
}

/// A script step at a virtual time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Time since start.
    pub at: Duration,
    /// What happens.
    pub kind: StepKind,
}

impl Step {
    /// Step at `ms` milliseconds.
    pub fn at_ms(ms: u64, kind: StepKind) -> Self {
        Self { at: Duration::from_millis(ms), kind }
    }
}

/// App state captured at a checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Checkpoint label.
    pub label: String,
    /// Virtual time of the checkpoint.
    pub at: Duration,
    /// Overlay shown.
    pub overlay_visible: bool,
    /// Active controls, ordered by grouping.
    pub active_controls: Vec<ControlId>,
    /// Active tab.
    pub active_tab: Option<TabId>,
    /// Mode awaiting confirmation.
    pub pending_confirmation: Option<ModeId>,
    /// Last mode the App saw announced.
    pub device_mode: Option<ModeId>,
}

impl Observation {
    fn capture(label: String, at: Duration, app: &App) -> Self {
        Self {
            label,
            at,
            overlay_visible: app.overlay_visible(),
            active_controls: app.highlights().active_controls().collect(),
            active_tab: app.highlights().active_tab(),
            pending_confirmation: app.pending_confirmation(),
            device_mode: app.device_mode(),
        }
    }
}

/// Driver running a script against a simulated device.
#[derive(Debug)]
pub struct SimDriver {
    clock: SimClock,
    device: SimDevice,
    script: VecDeque<Step>,
    inbox: VecDeque<DriverEvent>,
    device_online: bool,
    link_up: bool,
    connect_log: Vec<Duration>,
    sent: Vec<Command>,
    observations: Vec<Observation>,
    renders: usize,
}

impl SimDriver {
    /// Driver for `device`, running `script` (sorted by time here).
    pub fn new(device: SimDevice, script: impl IntoIterator<Item = Step>) -> Self {
        let mut script: Vec<Step> = script.into_iter().collect();
        script.sort_by_key(|step| step.at);
        Self {
            clock: SimClock::new(),
            device,
            script: script.into(),
            inbox: VecDeque::new(),
            device_online: true,
            link_up: false,
            connect_log: Vec::new(),
            sent: Vec::new(),
            observations: Vec::new(),
            renders: 0,
        }
    }

    /// Start with the device unreachable.
    #[must_use]
    pub fn starting_offline(mut self) -> Self {
        self.device_online = false;
        self
    }

    /// Virtual clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Simulated device.
    pub fn device(&self) -> &SimDevice {
        &self.device
    }

    /// Whether the link to the device is up.
    pub fn link_up(&self) -> bool {
        self.link_up
    }

    /// Virtual times at which a connection was attempted.
    pub fn connect_log(&self) -> &[Duration] {
        &self.connect_log
    }

    /// Commands that reached the device, in order.
    pub fn sent(&self) -> &[Command] {
        &self.sent
    }

    /// All checkpoint observations, in order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Observation recorded under `label`.
    pub fn observation(&self, label: &str) -> Option<&Observation> {
        self.observations.iter().find(|o| o.label == label)
    }

    /// Number of renders.
    pub fn renders(&self) -> usize {
        self.renders
    }

    fn broadcast(&mut self, notification: StateNotification) -> Result<(), SimError> {
        if self.link_up {
            self.inbox.push_back(DriverEvent::Frame(notification.encode()?));
        }
        Ok(())
    }

    fn drop_link(&mut self) {
        if self.link_up {
            self.link_up = false;
            self.inbox.push_back(DriverEvent::TransportClosed);
        }
    }

    fn next_wake(&self, wake_at: Option<Instant>) -> Option<Duration> {
        let step = self.script.front().map(|s| s.at)?;
        let timers = [wake_at, self.device.next_deadline()];
        let earliest = timers.into_iter().flatten().map(|t| self.clock.offset_of(t)).min();
        Some(earliest.map_or(step, |t| t.min(step)))
    }

    fn poll(
        &mut self,
        app: &App,
        wake_at: Option<Instant>,
    ) -> Result<Vec<DriverEvent>, SimError> {
        if !self.inbox.is_empty() {
            return Ok(self.inbox.drain(..).collect());
        }

        let Some(wake) = self.next_wake(wake_at) else {
            debug!("script exhausted");
            return Ok(vec![DriverEvent::Input(AppEvent::Quit)]);
        };
        self.clock.advance_to(wake);
        let now = self.clock.now();
        let elapsed = self.clock.elapsed();
        trace!(?elapsed, "sim time");

        while let Some(step) = self.script.front() {
            if step.at > elapsed {
                break;
            }
            // a checkpoint sees the effects of everything before it
            if matches!(step.kind, StepKind::Checkpoint(_)) && !self.inbox.is_empty() {
                break;
            }
            let Some(step) = self.script.pop_front() else { break };
            match step.kind {
                StepKind::Input(event) => self.inbox.push_back(DriverEvent::Input(event)),
                StepKind::DeviceMode(mode) => {
                    let notification = self.device.apply(&Command::new(mode), now);
                    self.broadcast(notification)?;
                },
                StepKind::DropLink => self.drop_link(),
                StepKind::DeviceOnline(online) => {
                    self.device_online = online;
                    if !online {
                        self.drop_link();
                    }
                },
                StepKind::Checkpoint(label) => {
                    self.observations.push(Observation::capture(label, elapsed, app));
                },
                StepKind::Quit => self.inbox.push_back(DriverEvent::Input(AppEvent::Quit)),
            }
        }

        if let Some(notification) = self.device.tick(now) {
            self.broadcast(notification)?;
        }

        Ok(self.inbox.drain(..).collect())
    }
}

impl Driver for SimDriver {
    type Error = SimError;

    fn poll_event(
        &mut self,
        app: &App,
        wake_at: Option<Instant>,
    ) -> impl Future<Output = Result<Vec<DriverEvent>, Self::Error>> + Send {
        std::future::ready(self.poll(app, wake_at))
    }

    fn connect(&mut self, url: &str) -> impl Future<Output = Result<(), Self::Error>> + Send {
        let at = self.clock.elapsed();
        debug!(url, ?at, online = self.device_online, "sim connect");
        self.connect_log.push(at);
        self.link_up = false;

        let result = if self.device_online {
            self.link_up = true;
            self.inbox.push_back(DriverEvent::TransportOpened);
            let announcement = self.device.announce();
            self.broadcast(announcement)
        } else {
            self.inbox.push_back(DriverEvent::TransportClosed);
            Ok(())
        };
        std::future::ready(result)
    }

    fn send_text(&mut self, text: String) -> impl Future<Output = Result<(), Self::Error>> + Send {
        let result = if self.link_up {
            Command::decode(&text).map_err(SimError::from).and_then(|command| {
                self.sent.push(command);
                let notification = self.device.apply(&command, self.clock.now());
                self.broadcast(notification)
            })
        } else {
            Err(SimError::LinkDown)
        };
        std::future::ready(result)
    }

    fn now(&self) -> Instant {
        self.clock.now()
    }

    fn render(&mut self, _app: &App) -> Result<(), Self::Error> {
        self.renders += 1;
        Ok(())
    }

    fn stop(&mut self) {
        self.link_up = false;
    }
}

#[cfg(test)]
mod tests {
    use drumlights_app::{Layout, SyncConfig};

    use super::*;

    fn app() -> App {
        App::new(Layout::drum_lights().unwrap(), SyncConfig::default())
    }

    #[tokio::test]
    async fn link_follows_device_reachability() {
        let app = app();
        let script =
            [Step::at_ms(100, StepKind::DeviceOnline(true)), Step::at_ms(500, StepKind::Quit)];
        let mut driver = SimDriver::new(SimDevice::with_mode(0, ModeId::new(3)), script)
            .starting_offline();

        driver.connect("ws://sim/ws").await.unwrap();
        assert!(!driver.link_up());
        let events = driver.poll_event(&app, None).await.unwrap();
        assert_eq!(events, vec![DriverEvent::TransportClosed]);

        // device comes back at 100ms
        assert!(driver.poll_event(&app, None).await.unwrap().is_empty());
        assert_eq!(driver.clock().elapsed(), Duration::from_millis(100));

        driver.connect("ws://sim/ws").await.unwrap();
        assert!(driver.link_up());
        assert_eq!(driver.poll_event(&app, None).await.unwrap(), vec![
            DriverEvent::TransportOpened,
            DriverEvent::Frame(r#"{"mode":3}"#.into()),
        ]);
        assert_eq!(driver.connect_log(), [Duration::ZERO, Duration::from_millis(100)]);
    }

    #[tokio::test]
    async fn sent_command_is_broadcast_back() {
        let app = app();
        let mut driver = SimDriver::new(SimDevice::new(0), []);
        driver.connect("ws://sim/ws").await.unwrap();
        driver.poll_event(&app, None).await.unwrap();

        driver.send_text(r#"{"mode":12}"#.into()).await.unwrap();
        assert_eq!(driver.sent(), [Command::new(ModeId::new(12))]);
        assert_eq!(driver.poll_event(&app, None).await.unwrap(), vec![DriverEvent::Frame(
            r#"{"mode":12}"#.into()
        )]);

        driver.render(&app).unwrap();
        assert_eq!(driver.renders(), 1);

        driver.stop();
        assert!(!driver.link_up());
        assert!(matches!(driver.send_text(r#"{"mode":1}"#.into()).await, Err(SimError::LinkDown)));
    }
}
