//! Mode identifiers.
//!
//! The device defines what each mode means. This layer only compares them,
//! with three exceptions that change controller behavior.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A device mode, carried on the wire as a bare JSON integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModeId(i32);

impl ModeId {
    /// Everything off. Clears all highlights and any active tab.
    pub const OFF: Self = Self(0);

    /// Device picks random modes on a timer until another mode is set.
    pub const AUTO: Self = Self(-1);

    /// High-impact mode that must be confirmed by the user before sending.
    pub const SENTINEL: Self = Self(199);

    /// Wrap a raw mode number.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw mode number.
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Whether this is the all-off mode.
    pub const fn is_off(self) -> bool {
        self.0 == Self::OFF.0
    }

    /// Whether this mode requires confirmation.
    pub const fn is_sentinel(self) -> bool {
        self.0 == Self::SENTINEL.0
    }

    /// Whether this is the device's auto-cycle mode.
    pub const fn is_auto(self) -> bool {
        self.0 == Self::AUTO.0
    }
}

impl From<i32> for ModeId {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_modes() {
        assert!(ModeId::new(0).is_off());
        assert!(ModeId::new(199).is_sentinel());
        assert!(ModeId::new(-1).is_auto());
        assert!(!ModeId::new(2).is_off());
        assert!(!ModeId::new(2).is_sentinel());
    }

    #[test]
    fn display_uses_hash_prefix() {
        assert_eq!(ModeId::new(12).to_string(), "#12");
        assert_eq!(ModeId::AUTO.to_string(), "#-1");
    }
}
