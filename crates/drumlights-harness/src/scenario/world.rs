//! Final state of a scenario run.

use drumlights_app::{App, ControlId, Layout};
use drumlights_core::Connection;
use drumlights_proto::ModeId;

use crate::{Observation, SimDriver};

/// Everything a scenario leaves behind for its oracle.
#[derive(Debug)]
pub struct World {
    app: App,
    connection: Connection,
    driver: SimDriver,
}

impl World {
    pub(crate) fn new(app: App, connection: Connection, driver: SimDriver) -> Self {
        Self { app, connection, driver }
    }

    /// Final App state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Final connection state.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Simulation driver, with its logs.
    pub fn driver(&self) -> &SimDriver {
        &self.driver
    }

    /// Observation under `label`, or an error naming it.
    pub fn observation(&self, label: &str) -> Result<&Observation, String> {
        self.driver.observation(label).ok_or_else(|| format!("no checkpoint {label:?}"))
    }

    /// The control configured for `mode` in a single-grouping layout.
    pub fn control_for(&self, mode: i32) -> Option<ControlId> {
        self.layout().controls_for_mode(ModeId::new(mode)).first().copied()
    }

    /// Layout in use.
    pub fn layout(&self) -> &Layout {
        self.app.layout()
    }

    /// Modes of the commands the device received, in order.
    pub fn sent_modes(&self) -> Vec<i32> {
        self.driver.sent().iter().map(|c| c.mode.get()).collect()
    }
}
