//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::{future::Future, time::Instant};

use crate::{App, AppEvent};

/// Something that happened at the driver's edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    /// User input, already mapped to an App event.
    Input(AppEvent),
    /// The transport requested by [`Driver::connect`] is open.
    TransportOpened,
    /// The transport closed or failed.
    TransportClosed,
    /// A text frame arrived on the transport.
    Frame(String),
}

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`crate::Runtime`] handles orchestration logic. This ensures
/// the same orchestration code runs in the terminal and in simulation.
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next batch of events.
    ///
    /// Must return no later than `wake_at` (possibly with no events) so the
    /// runtime can fire timers.
    fn poll_event(
        &mut self,
        app: &App,
        wake_at: Option<Instant>,
    ) -> impl Future<Output = Result<Vec<DriverEvent>, Self::Error>> + Send;

    /// Start opening a transport to `url`.
    ///
    /// The outcome arrives later as [`DriverEvent::TransportOpened`] or
    /// [`DriverEvent::TransportClosed`]. Any previous transport is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the attempt cannot even be started.
    fn connect(&mut self, url: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Send a text frame on the open transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport is gone.
    fn send_text(&mut self, text: String) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Current time. Simulation drivers return virtual time.
    fn now(&self) -> Instant;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Stop the transport and clean up resources.
    fn stop(&mut self);
}
