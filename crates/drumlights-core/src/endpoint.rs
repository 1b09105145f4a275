//! Socket endpoint resolution.
//!
//! Production builds talk to the device that served the controller, at
//! `ws://<host>/ws`. Development builds talk to a public echo server so the
//! UI can be exercised without hardware. The choice is made at compile time
//! by the `dev-endpoint` feature and never re-evaluated at runtime.

use std::fmt;

use crate::error::ConnectionError;

/// Fixed endpoint used by development builds.
pub const DEV_ENDPOINT: &str = "ws://websocket-echo.com/";

/// Socket path served by the device firmware.
pub const DEVICE_WS_PATH: &str = "/ws";

/// Which endpoint family this build targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Connect to the device at the given host.
    Production,
    /// Connect to [`DEV_ENDPOINT`].
    Development,
}

impl BuildMode {
    /// Build mode selected by cargo features.
    pub const fn from_build() -> Self {
        if cfg!(feature = "dev-endpoint") { Self::Development } else { Self::Production }
    }
}

/// A resolved WebSocket URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: String,
}

impl Endpoint {
    /// Resolve the endpoint for `mode`.
    ///
    /// `host` is the device's host (and optional port), e.g. `192.168.4.1`.
    /// It is ignored in development builds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHost` in production if `host` is empty or contains a
    /// path separator or whitespace.
    pub fn resolve(mode: BuildMode, host: &str) -> Result<Self, ConnectionError> {
        match mode {
            BuildMode::Development => Ok(Self { url: DEV_ENDPOINT.to_string() }),
            BuildMode::Production => {
                let host = host.trim();
                if host.is_empty() || host.contains('/') || host.contains(char::is_whitespace) {
                    return Err(ConnectionError::InvalidHost { host: host.to_string() });
                }
                Ok(Self { url: format!("ws://{host}{DEVICE_WS_PATH}") })
            },
        }
    }

    /// Use a literal URL as-is.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// The URL to open.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_uses_device_host() {
        let endpoint = Endpoint::resolve(BuildMode::Production, "192.168.4.1").unwrap();
        assert_eq!(endpoint.url(), "ws://192.168.4.1/ws");
    }

    #[test]
    fn production_keeps_port() {
        let endpoint = Endpoint::resolve(BuildMode::Production, "drumlights.local:8080").unwrap();
        assert_eq!(endpoint.url(), "ws://drumlights.local:8080/ws");
    }

    #[test]
    fn development_ignores_host() {
        let endpoint = Endpoint::resolve(BuildMode::Development, "").unwrap();
        assert_eq!(endpoint.url(), DEV_ENDPOINT);
    }

    #[test]
    fn rejects_unusable_hosts() {
        for host in ["", "   ", "host/path", "two words"] {
            let result = Endpoint::resolve(BuildMode::Production, host);
            assert!(matches!(result, Err(ConnectionError::InvalidHost { .. })), "{host:?}");
        }
    }
}
