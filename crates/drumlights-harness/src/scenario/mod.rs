//! Scenario testing.
//!
//! A [`Scenario`] declares the controller's configuration, the device's
//! starting state and a timed script. It cannot run without an oracle, so
//! every scenario verifies something about the final [`World`].

mod builder;
pub mod oracle;
mod world;

pub use builder::{RunnableScenario, Scenario};
pub use world::World;

/// Verification run against the final world.
pub type OracleFn = Box<dyn Fn(&World) -> Result<(), String>>;
