//! Execution monitor configuration.

use serde::{Deserialize, Serialize};

/// Settings for the periodic execution-monitor snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Whether the snapshot loop runs at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Interval between snapshots, in seconds.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_seconds: default_interval(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval() -> u64 {
    30
}
