//! Simulated device firmware.
//!
//! Models what the controller can observe of the device: the current mode,
//! the broadcast after every command, auto mode's periodic re-pick and the
//! strobe revert.

use std::time::{Duration, Instant};

use drumlights_proto::{Command, ModeId, StateNotification};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Modes auto mode picks from.
pub const AUTO_MODES: [i32; 24] = [
    1, 2, 3, 4, 5, 6, 7, 8, 11, 12, 13, 14, 15, 16, 17, 18, 81, 82, 83, 84, 85, 86, 87, 88,
];

/// Periodic re-picks only draw from the first this many [`AUTO_MODES`].
pub const REPICK_MODES: usize = 21;

/// How long auto mode stays on one pick.
pub const AUTO_INTERVAL: Duration = Duration::from_secs(30);

/// One-shot strobe. The device flashes and returns to the previous mode.
pub const STROBE: ModeId = ModeId::new(98);

/// Simulated device.
#[derive(Debug, Clone)]
pub struct SimDevice {
    mode: ModeId,
    /// Next auto re-pick, while auto is on
    auto_due: Option<Instant>,
    rng: ChaCha8Rng,
}

impl SimDevice {
    /// Device in the off mode.
    pub fn new(seed: u64) -> Self {
        Self::with_mode(seed, ModeId::OFF)
    }

    /// Device already running `mode`.
    pub fn with_mode(seed: u64, mode: ModeId) -> Self {
        Self { mode, auto_due: None, rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Mode currently broadcast.
    pub fn mode(&self) -> ModeId {
        self.mode
    }

    /// Whether auto mode is cycling.
    pub fn is_auto(&self) -> bool {
        self.auto_due.is_some()
    }

    /// Notification carrying the current mode.
    pub fn announce(&self) -> StateNotification {
        StateNotification::new(self.mode)
    }

    /// Apply a command and return the notification broadcast to all clients.
    pub fn apply(&mut self, command: &Command, now: Instant) -> StateNotification {
        let previous = self.mode;
        let mut next = command.mode;

        if next.is_auto() {
            next = self.pick(AUTO_MODES.len());
            self.auto_due = Some(now + AUTO_INTERVAL);
            debug!(mode = %next, "auto on");
        } else if self.auto_due.take().is_some() {
            debug!("auto off");
        }

        self.mode = if next == STROBE { previous } else { next };
        self.announce()
    }

    /// Re-pick if auto mode is due. Returns the broadcast, if any.
    ///
    /// Unlike the first pick, a re-pick never lands on 86, 87 or 88.
    pub fn tick(&mut self, now: Instant) -> Option<StateNotification> {
        let due = self.auto_due?;
        if now < due {
            return None;
        }
        self.mode = self.pick(REPICK_MODES);
        self.auto_due = Some(due + AUTO_INTERVAL);
        debug!(mode = %self.mode, "auto re-pick");
        Some(self.announce())
    }

    /// When [`Self::tick`] next has work.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.auto_due
    }

    fn pick(&mut self, from: usize) -> ModeId {
        ModeId::new(AUTO_MODES[self.rng.gen_range(0..from)])
    }
}
