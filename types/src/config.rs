//! Tracker configuration shared by the library and the CLI.
//!
//! Loaded from the user's config directory by the binary; every field has a
//! default so a missing or partial file still yields a usable config.

use serde::{Deserialize, Serialize};

/// Zone that is passed through without disturbing any per-zone statistics.
pub const DEFAULT_IGNORED_ZONE: &str = "The Bazaar";

/// Wall-clock cadence (and rate divisor) of the windowed damage report.
pub const DEFAULT_REPORT_INTERVAL_SECS: u64 = 60;

/// Sleep between EOF polls while tailing.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub ignored_zone: String,
    pub report_interval_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            ignored_zone: DEFAULT_IGNORED_ZONE.to_string(),
            report_interval_secs: DEFAULT_REPORT_INTERVAL_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl TrackerConfig {
    /// Report interval clamped to at least one second.
    pub fn report_interval_secs(&self) -> u64 {
        self.report_interval_secs.max(1)
    }

    pub fn is_ignored_zone(&self, zone: &str) -> bool {
        zone == self.ignored_zone
    }
}
