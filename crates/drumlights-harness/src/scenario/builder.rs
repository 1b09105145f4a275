//! Scenario builder API.
//!
//! Provides a declarative API for constructing scenario tests that enforce
//! the Oracle Pattern.

use drumlights_app::{App, AppEvent, Bridge, Layout, Runtime, SyncConfig};
use drumlights_core::{Connection, ConnectionConfig, Endpoint};
use drumlights_proto::ModeId;

use crate::{
    SimDevice, SimDriver, Step, StepKind,
    scenario::{OracleFn, World},
};

/// URL the simulated controller connects to.
const SIM_URL: &str = "ws://sim-device/ws";

/// Scenario builder.
///
/// Configure the controller and the device, add timed steps, then call
/// `.oracle()` to get a [`RunnableScenario`].
pub struct Scenario {
    name: String,
    seed: u64,
    layout: Option<Layout>,
    sync: SyncConfig,
    connection: ConnectionConfig,
    device_mode: ModeId,
    device_online: bool,
    steps: Vec<Step>,
}

impl Scenario {
    /// New scenario with the default catalog and configuration, against an
    /// online device in the off mode.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            seed: 0,
            layout: None,
            sync: SyncConfig::default(),
            connection: ConnectionConfig::default(),
            device_mode: ModeId::OFF,
            device_online: true,
            steps: Vec::new(),
        }
    }

    /// Seed for the device's RNG.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Use a custom layout.
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Synchronizer configuration.
    pub fn sync_config(mut self, config: SyncConfig) -> Self {
        self.sync = config;
        self
    }

    /// Connection configuration.
    pub fn connection_config(mut self, config: ConnectionConfig) -> Self {
        self.connection = config;
        self
    }

    /// Mode the device is running when the scenario starts.
    pub fn device_mode(mut self, mode: i32) -> Self {
        self.device_mode = ModeId::new(mode);
        self
    }

    /// Start with the device unreachable.
    pub fn device_offline(mut self) -> Self {
        self.device_online = false;
        self
    }

    /// Add a step at `ms`.
    pub fn step(mut self, ms: u64, kind: StepKind) -> Self {
        self.steps.push(Step::at_ms(ms, kind));
        self
    }

    /// User input at `ms`.
    pub fn input(self, ms: u64, event: AppEvent) -> Self {
        self.step(ms, StepKind::Input(event))
    }

    /// Checkpoint at `ms`.
    pub fn checkpoint(self, ms: u64, label: impl Into<String>) -> Self {
        self.step(ms, StepKind::Checkpoint(label.into()))
    }

    /// Quit at `ms`.
    pub fn quit_at(self, ms: u64) -> Self {
        self.step(ms, StepKind::Quit)
    }

    /// Set the oracle function and return a runnable scenario.
    ///
    /// The oracle is mandatory - you cannot run a scenario without
    /// verification.
    pub fn oracle(self, oracle: OracleFn) -> RunnableScenario {
        RunnableScenario { scenario: self, oracle }
    }
}

/// A scenario with an oracle function that can be executed.
pub struct RunnableScenario {
    scenario: Scenario,
    oracle: OracleFn,
}

impl RunnableScenario {
    /// Run the production runtime against the simulated device until the
    /// script ends, then invoke the oracle on the final world.
    pub async fn run(self) -> Result<(), String> {
        let Scenario {
            name,
            seed,
            layout,
            sync,
            connection,
            device_mode,
            device_online,
            steps,
        } = self.scenario;

        let layout = match layout {
            Some(layout) => layout,
            None => Layout::drum_lights().map_err(|e| format!("Scenario '{name}': {e}"))?,
        };

        let app = App::new(layout, sync);
        let bridge = Bridge::new(Connection::new(Endpoint::from_url(SIM_URL), connection));
        let mut driver = SimDriver::new(SimDevice::with_mode(seed, device_mode), steps);
        if !device_online {
            driver = driver.starting_offline();
        }

        let mut runtime = Runtime::new(app, bridge, driver);
        runtime.run().await.map_err(|e| format!("Scenario '{name}': runtime failed: {e}"))?;

        let (app, bridge, driver) = runtime.into_parts();
        let world = World::new(app, bridge.connection().clone(), driver);

        (self.oracle)(&world).map_err(|e| format!("Scenario '{name}': {e}"))
    }
}
