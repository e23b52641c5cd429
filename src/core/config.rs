//! Engine timing and address-space configuration
//!
//! All timings are stored in milliseconds. A project may override any
//! field through an optional `config.json`; missing fields fall back to
//! the defaults below.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::hardware::ExpanderPin;

/// Tunable parameters for one cabinet's test runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestConfig {
    /// Expander bus addresses installed in the test fixture.
    #[serde(default = "default_expander_addresses")]
    pub expander_addresses: Vec<u8>,
    /// The shared sense input. Never driven as an output and excluded
    /// from the fallback search space.
    #[serde(default = "default_sense_pin")]
    pub sense_pin: ExpanderPin,
    /// Deadline for one terminal's probe before the fallback scan starts.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// Interval between sense polls while probing.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Settle time per candidate during the fallback scan.
    #[serde(default = "default_scan_settle_ms")]
    pub scan_settle_ms: u64,
    /// Pause after a terminal resolves, before its prompt is dismissed.
    #[serde(default = "default_terminal_pause_ms")]
    pub terminal_pause_ms: u64,
    /// Countdown shown on the operator confirmation prompt.
    #[serde(default = "default_confirm_timeout_ms")]
    pub confirm_timeout_ms: u64,
}

fn default_expander_addresses() -> Vec<u8> {
    (0x21..=0x27).collect()
}

fn default_sense_pin() -> ExpanderPin {
    ExpanderPin::new(0x26, 0)
}

fn default_probe_timeout_ms() -> u64 {
    30_000
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_scan_settle_ms() -> u64 {
    100
}

fn default_terminal_pause_ms() -> u64 {
    2_000
}

fn default_confirm_timeout_ms() -> u64 {
    30_000
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            expander_addresses: default_expander_addresses(),
            sense_pin: default_sense_pin(),
            probe_timeout_ms: default_probe_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            scan_settle_ms: default_scan_settle_ms(),
            terminal_pause_ms: default_terminal_pause_ms(),
            confirm_timeout_ms: default_confirm_timeout_ms(),
        }
    }
}

impl TestConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn scan_settle(&self) -> Duration {
        Duration::from_millis(self.scan_settle_ms)
    }

    pub fn terminal_pause(&self) -> Duration {
        Duration::from_millis(self.terminal_pause_ms)
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_millis(self.confirm_timeout_ms)
    }
}
