use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Availability registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityConfig {
    /// Number of reported failures that blacklists a resource
    #[serde(default = "default_blacklist_threshold")]
    pub blacklist_threshold: u32,

    /// Seconds a blacklisted resource stays excluded after its last failure
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Ranked resource names tried in order when the preferred one is down
    #[serde(default)]
    pub fallback_order: Vec<String>,
}

fn default_blacklist_threshold() -> u32 {
    3
}

fn default_cooldown_secs() -> u64 {
    300
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            blacklist_threshold: default_blacklist_threshold(),
            cooldown_secs: default_cooldown_secs(),
            fallback_order: Vec::new(),
        }
    }
}

impl AvailabilityConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

/// Health snapshot entry for one tracked resource
#[derive(Debug, Clone, Serialize)]
pub struct ResourceHealth {
    pub available: bool,
    pub failure_count: u32,
    pub last_error_code: u16,
    /// Most recent failure as Unix epoch seconds
    pub last_failure_unix: u64,
}
