use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Window the host has to answer an awaitable request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// How reply listeners are attached to the bridge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListenerPolicy {
    /// One bridge listener per reply channel; replies settle waiting
    /// requests oldest first, one reply per request.
    #[default]
    Route,
    /// Every request registers its own permanent bridge listener. A reply
    /// settles every request still pending on that channel, and listeners
    /// pile up for the life of the page.
    Accumulate,
}

/// Correlator tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CorrelatorConfig {
    /// How long a request waits for its reply.
    pub timeout: Duration,
    /// Listener attachment strategy.
    pub policy: ListenerPolicy,
}

impl CorrelatorConfig {
    /// Overrides the reply window.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the listener policy.
    pub fn with_policy(mut self, policy: ListenerPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Default for CorrelatorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            policy: ListenerPolicy::default(),
        }
    }
}
