use std::time::Duration;

use correlator::{CorrelatorConfig, ListenerPolicy, DEFAULT_TIMEOUT};
use lockdown::LockdownPolicy;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ShellError, ShellResult};

/// Options the page passes to `shell_init`. Every field is optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShellOptions {
    /// Reply window for awaitable calls, in milliseconds.
    pub timeout_ms: u64,
    /// How reply listeners attach to the bridge.
    pub listener_policy: ListenerPolicy,
    /// Page lockdown switches.
    pub lockdown: LockdownPolicy,
    /// Console verbosity (`off`, `error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            listener_policy: ListenerPolicy::default(),
            lockdown: LockdownPolicy::default(),
            log_level: "info".into(),
        }
    }
}

impl ShellOptions {
    /// Parses the JSON form. `null` means all defaults.
    pub fn from_json(value: Value) -> ShellResult<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(ShellError::InvalidOptions)
    }

    /// Correlator settings derived from these options.
    pub fn correlator_config(&self) -> CorrelatorConfig {
        CorrelatorConfig::default()
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_policy(self.listener_policy)
    }

    /// Parsed [`ShellOptions::log_level`].
    pub fn level_filter(&self) -> ShellResult<LevelFilter> {
        self.log_level
            .parse()
            .map_err(|_| ShellError::InvalidLogLevel(self.log_level.clone()))
    }
}
