//! TOML configuration for the claimcheck binaries.
//!
//! Every key is optional. A missing file section falls back to the defaults
//! below, which match a verification service running on localhost:8000.
//!
//! ```toml
//! [service]
//! endpoint = "http://localhost:8000/verify"
//! timeout_secs = 30
//! connect_timeout_secs = 5
//!
//! [relay]
//! queue_capacity = 32
//!
//! [notification]
//! dwell_secs = 8
//! fade_millis = 400
//!
//! [capture]
//! hotkey = "Ctrl+Shift+V"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chord::KeyChord;
use crate::error::{ClaimcheckError, ClaimcheckResult};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/verify";

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimcheckConfig {
    pub service: ServiceConfig,
    pub relay: RelayConfig,
    pub notification: NotificationConfig,
    pub capture: CaptureConfig,
}

/// Where and how the verification client reaches the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub endpoint: String,
    /// Whole-request timeout. The service has no timeout contract of its own,
    /// so a hung call is cut off here instead of pending forever.
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 5,
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Envelopes buffered before senders wait for the relay to catch up.
    pub queue_capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self { queue_capacity: 32 }
    }
}

/// Notification lifecycle timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub dwell_secs: u64,
    pub fade_millis: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dwell_secs: 8,
            fade_millis: 400,
        }
    }
}

impl NotificationConfig {
    pub fn dwell(&self) -> Duration {
        Duration::from_secs(self.dwell_secs)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_millis)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub hotkey: KeyChord,
}

impl ClaimcheckConfig {
    /// Parse `s` as TOML and validate the result.
    pub fn from_toml_str(s: &str) -> ClaimcheckResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ClaimcheckError::Config {
            reason: format!("failed to parse config TOML: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse the TOML file at `path`.
    pub fn from_file(path: &Path) -> ClaimcheckResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ClaimcheckError::Config {
            reason: format!("failed to read config file '{}': {e}", path.display()),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load from `path` when given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> ClaimcheckResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> ClaimcheckResult<()> {
        let endpoint = self.service.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(config_error(format!(
                "service.endpoint must be an http(s) URL, got '{endpoint}'"
            )));
        }
        if self.service.timeout_secs == 0 {
            return Err(config_error("service.timeout_secs must be at least 1"));
        }
        if self.service.connect_timeout_secs == 0 {
            return Err(config_error("service.connect_timeout_secs must be at least 1"));
        }
        if self.relay.queue_capacity == 0 {
            return Err(config_error("relay.queue_capacity must be at least 1"));
        }
        if self.notification.dwell_secs == 0 {
            return Err(config_error("notification.dwell_secs must be at least 1"));
        }
        Ok(())
    }
}

fn config_error(reason: impl Into<String>) -> ClaimcheckError {
    ClaimcheckError::Config {
        reason: reason.into(),
    }
}
