//! Deterministic simulation harness for the Drum Lights controller.
//!
//! A simulated device and a scripted [`Driver`](drumlights_app::Driver) run
//! the production [`Runtime`](drumlights_app::Runtime) on virtual time, so
//! reconnect timing, link loss and device behaviour are reproducible from a
//! seed.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod device;
pub mod driver;
pub mod scenario;

pub use clock::SimClock;
pub use device::SimDevice;
pub use driver::{Observation, SimDriver, SimError, Step, StepKind};
