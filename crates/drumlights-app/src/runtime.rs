//! Generic runtime
//!
//! Owns the [`App`], the [`Bridge`] and a [`Driver`], and moves work between
//! them in order. All work goes through one FIFO queue, so an event's
//! consequences are fully processed before the next driver poll and two
//! runs fed the same driver events do the same thing.

use std::collections::VecDeque;

use drumlights_core::ConnectionAction;
use tracing::{debug, info, warn};

use crate::{App, AppAction, Bridge, Driver, DriverEvent};

#[derive(Debug)]
enum Work {
    Driver(DriverEvent),
    App(AppAction),
    Connection(ConnectionAction),
    Tick,
}

/// Dispatch loop tying the App and the connection to a driver.
#[derive(Debug)]
pub struct Runtime<D: Driver> {
    app: App,
    bridge: Bridge,
    driver: D,
}

impl<D: Driver> Runtime<D> {
    /// Assemble a runtime.
    pub fn new(app: App, bridge: Bridge, driver: D) -> Self {
        Self { app, bridge, driver }
    }

    /// Take the runtime apart, e.g. to inspect a simulation driver.
    pub fn into_parts(self) -> (App, Bridge, D) {
        (self.app, self.bridge, self.driver)
    }

    /// Run until the App asks to quit.
    ///
    /// Connects on start. Renders at most once per batch of work.
    ///
    /// # Errors
    ///
    /// Returns the driver's error if polling or rendering fails. Transport
    /// errors are not fatal: they become a close and a scheduled reconnect.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        let mut queue = VecDeque::from([Work::App(AppAction::Connect), Work::App(AppAction::Render)]);

        loop {
            let mut render = false;

            while let Some(work) = queue.pop_front() {
                match work {
                    Work::Driver(event) => self.driver_event(event, &mut queue),
                    Work::Tick => {
                        let now = self.driver.now();
                        queue.extend(self.bridge.tick(now).into_iter().map(Work::Connection));
                    },
                    Work::App(AppAction::Render) => render = true,
                    Work::App(AppAction::Quit) => {
                        info!("quit requested");
                        self.driver.stop();
                        return Ok(());
                    },
                    Work::App(action) => {
                        let now = self.driver.now();
                        let actions = self.bridge.handle_app_action(&action, now);
                        queue.extend(actions.into_iter().map(Work::Connection));
                    },
                    Work::Connection(ConnectionAction::Open { url }) => {
                        if let Err(err) = self.driver.connect(&url).await {
                            warn!(%err, %url, "connect failed");
                            let now = self.driver.now();
                            let actions = self.bridge.transport_closed(now);
                            queue.extend(actions.into_iter().map(Work::Connection));
                        }
                    },
                    Work::Connection(ConnectionAction::SendText(text)) => {
                        if let Err(err) = self.driver.send_text(text).await {
                            warn!(%err, "send failed");
                        }
                    },
                    Work::Connection(ConnectionAction::Emit(event)) => {
                        let actions = self.app.handle(Bridge::app_event(event));
                        queue.extend(actions.into_iter().map(Work::App));
                    },
                }
            }

            if render {
                self.driver.render(&self.app)?;
            }

            let wake_at = self.bridge.next_deadline();
            let events = self.driver.poll_event(&self.app, wake_at).await?;
            debug!(count = events.len(), "driver events");
            queue.extend(events.into_iter().map(Work::Driver));
            queue.push_back(Work::Tick);
        }
    }

    fn driver_event(&mut self, event: DriverEvent, queue: &mut VecDeque<Work>) {
        let now = self.driver.now();
        match event {
            DriverEvent::Input(event) => {
                queue.extend(self.app.handle(event).into_iter().map(Work::App));
            },
            DriverEvent::TransportOpened => {
                queue.extend(self.bridge.transport_opened(now).into_iter().map(Work::Connection));
            },
            DriverEvent::TransportClosed => {
                queue.extend(self.bridge.transport_closed(now).into_iter().map(Work::Connection));
            },
            DriverEvent::Frame(text) => {
                queue.extend(self.bridge.receive(&text).into_iter().map(Work::Connection));
            },
        }
    }
}
