//! Commands and state notifications.
//!
//! Both directions share the wire shape `{"mode": <integer>}`. Extra fields
//! are ignored so newer firmware can add to the object without breaking
//! older controllers.

use serde::{Deserialize, Serialize, de::DeserializeOwned, de::Error as _};

use crate::{ModeId, ProtocolError, Result};

/// Controller to device: switch to `mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Requested mode.
    pub mode: ModeId,
}

impl Command {
    /// Create a command for `mode`.
    pub const fn new(mode: ModeId) -> Self {
        Self { mode }
    }

    /// Serialize to a text frame.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    /// Parse a text frame.
    pub fn decode(raw: &str) -> Result<Self> {
        decode_object(raw)
    }
}

/// Device to controller: the device is now in `mode`.
///
/// Sent on every state change and once right after each connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateNotification {
    /// Mode the device is in.
    pub mode: ModeId,
}

impl StateNotification {
    /// Create a notification for `mode`.
    pub const fn new(mode: ModeId) -> Self {
        Self { mode }
    }

    /// Serialize to a text frame.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    /// Parse a text frame.
    pub fn decode(raw: &str) -> Result<Self> {
        decode_object(raw)
    }
}

/// Derived deserializers also accept `[2]` for a one-field struct, so the
/// frame is checked to be an object first.
fn decode_object<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(ProtocolError::Malformed)?;
    if !value.is_object() {
        return Err(ProtocolError::Malformed(serde_json::Error::custom("expected a JSON object")));
    }
    serde_json::from_value(value).map_err(ProtocolError::Malformed)
}
