//! Fallback connection discovery
//!
//! When the expected line times out, the most actionable diagnosis is
//! "what IS actually wired here". The scanner walks the entire expander
//! address space in a fixed order (ascending address, then ascending pin,
//! skipping the reserved sense line), pulsing each candidate and checking
//! the sense input, until the first hit or exhaustion.

use std::time::Duration;

use anyhow::Result;

use crate::hardware::{ExpanderPin, PinBus, PINS_PER_EXPANDER};

/// Result of an exhaustive address-space scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// First line whose drive asserted the sense input.
    Found(ExpanderPin),
    /// The whole space was exhausted without a hit.
    NotFound,
}

/// Ordered, finite sequence of scan candidates.
///
/// The fixed order makes scan results reproducible; consuming the
/// iterator up to the first match keeps early exit explicit.
#[derive(Debug, Clone)]
pub struct ScanCandidates {
    addresses: Vec<u8>,
    sense: ExpanderPin,
    addr_idx: usize,
    pin: u8,
}

impl ScanCandidates {
    pub fn new(addresses: &[u8], sense: ExpanderPin) -> Self {
        let mut addresses = addresses.to_vec();
        addresses.sort_unstable();
        addresses.dedup();
        Self {
            addresses,
            sense,
            addr_idx: 0,
            pin: 0,
        }
    }
}

impl Iterator for ScanCandidates {
    type Item = ExpanderPin;

    fn next(&mut self) -> Option<ExpanderPin> {
        loop {
            let address = *self.addresses.get(self.addr_idx)?;
            if self.pin >= PINS_PER_EXPANDER {
                self.addr_idx += 1;
                self.pin = 0;
                continue;
            }
            let candidate = ExpanderPin::new(address, self.pin);
            self.pin += 1;
            if candidate == self.sense {
                continue;
            }
            return Some(candidate);
        }
    }
}

/// Search the full address space for the line actually wired through to
/// the sense input.
///
/// Each candidate is driven high for the settle delay, checked, and
/// restored regardless of outcome.
pub async fn scan(
    bus: &dyn PinBus,
    addresses: &[u8],
    sense: ExpanderPin,
    settle: Duration,
) -> Result<ScanOutcome> {
    for candidate in ScanCandidates::new(addresses, sense) {
        bus.set_output(candidate, true)?;
        tokio::time::sleep(settle).await;
        let asserted = bus.read_input(sense);
        let restored = bus.set_output(candidate, false);
        let asserted = asserted?;
        restored?;
        if asserted {
            log::debug!("🔍 Scan hit on {candidate}");
            return Ok(ScanOutcome::Found(candidate));
        }
    }
    Ok(ScanOutcome::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::sim::SimulatedBus;

    const SENSE: ExpanderPin = ExpanderPin {
        address: 0x22,
        pin: 0,
    };

    #[test]
    fn candidates_ascend_and_skip_the_sense_pin() {
        let candidates: Vec<_> = ScanCandidates::new(&[0x23, 0x21, 0x22], SENSE).collect();

        assert_eq!(candidates.len(), 3 * 16 - 1);
        assert_eq!(candidates[0], ExpanderPin::new(0x21, 0));
        assert_eq!(candidates[15], ExpanderPin::new(0x21, 15));
        // 0x22 starts at pin 1 because pin 0 is the sense line.
        assert_eq!(candidates[16], ExpanderPin::new(0x22, 1));
        assert!(!candidates.contains(&SENSE));

        let mut sorted = candidates.clone();
        sorted.sort();
        assert_eq!(candidates, sorted);
    }

    #[test]
    fn scan_returns_first_wired_line() {
        let bus = SimulatedBus::new(SENSE);
        bus.wire(ExpanderPin::new(0x23, 9));
        bus.wire(ExpanderPin::new(0x23, 12));

        let outcome = tokio_test::block_on(scan(
            &bus,
            &[0x21, 0x22, 0x23],
            SENSE,
            Duration::from_millis(1),
        ))
        .unwrap();
        assert_eq!(outcome, ScanOutcome::Found(ExpanderPin::new(0x23, 9)));

        // Every driven candidate was restored before the next one.
        let driven = bus.driven_high();
        let visited: Vec<_> =
            ScanCandidates::new(&[0x21, 0x22, 0x23], SENSE).collect();
        assert_eq!(driven, visited[..driven.len()]);

        // Same hardware state, same result.
        let again = tokio_test::block_on(scan(
            &bus,
            &[0x21, 0x22, 0x23],
            SENSE,
            Duration::from_millis(1),
        ))
        .unwrap();
        assert_eq!(again, outcome);
    }

    #[test]
    fn scan_exhausts_to_not_found() {
        let bus = SimulatedBus::new(SENSE);

        let outcome = tokio_test::block_on(scan(
            &bus,
            &[0x21],
            SENSE,
            Duration::from_millis(1),
        ))
        .unwrap();
        assert_eq!(outcome, ScanOutcome::NotFound);
        assert_eq!(bus.driven_high().len(), 16);
    }
}
