//! Terminal probe
//!
//! Drives one expander line high and polls the shared sense input until
//! continuity is detected or the deadline passes. The poll interval is a
//! compromise between responsiveness and bus saturation; each sleep is an
//! await point, so the confirmation countdown stays live while the probe
//! runs.

use std::time::Duration;

use anyhow::Result;
use tokio::time::Instant;

use crate::hardware::{ExpanderPin, PinBus};

/// Result of a single probe cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The sense input asserted before the deadline.
    Resolved,
    /// The deadline passed without the sense input asserting.
    TimedOut,
}

/// Probe one line: drive it high, poll the sense input, restore the line.
///
/// Exactly one physical pin is toggled per call, and it is driven back
/// low on every exit path (including timeout and sense faults) so later
/// probes never see cross-talk from this one.
pub async fn probe(
    bus: &dyn PinBus,
    output: ExpanderPin,
    sense: ExpanderPin,
    deadline: Duration,
    poll_interval: Duration,
) -> Result<ProbeOutcome> {
    bus.set_output(output, true)?;
    let outcome = poll_sense(bus, sense, deadline, poll_interval).await;
    let restored = bus.set_output(output, false);
    let outcome = outcome?;
    restored?;
    Ok(outcome)
}

async fn poll_sense(
    bus: &dyn PinBus,
    sense: ExpanderPin,
    deadline: Duration,
    poll_interval: Duration,
) -> Result<ProbeOutcome> {
    let started = Instant::now();
    loop {
        if bus.read_input(sense)? {
            return Ok(ProbeOutcome::Resolved);
        }
        if started.elapsed() >= deadline {
            return Ok(ProbeOutcome::TimedOut);
        }
        tokio::time::sleep(poll_interval).await;
    }
}
