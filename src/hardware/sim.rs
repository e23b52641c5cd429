//! In-memory pin bus simulation
//!
//! Models a bank of expanders whose pins may be physically wired through
//! to the shared sense line. A driven pin that is wired pulls the sense
//! input high, which is exactly the observable behavior the engine relies
//! on. Every bus operation is journaled so tests can assert on hardware
//! access order (or on its absence).

use std::collections::BTreeSet;

use anyhow::Result;
use parking_lot::Mutex;

use super::{ExpanderPin, PinBus};

/// One journaled bus operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    /// `set_output` call with the level that was driven.
    Drive { pin: ExpanderPin, level: bool },
    /// `read_input` call with the level that was observed.
    Sense { pin: ExpanderPin, level: bool },
}

#[derive(Debug, Default)]
struct SimState {
    /// Pins physically wired through to the sense line.
    wired: BTreeSet<ExpanderPin>,
    /// Pins currently driven high.
    driven: BTreeSet<ExpanderPin>,
    journal: Vec<BusEvent>,
}

/// Simulated expander bank sharing one sense line.
#[derive(Debug)]
pub struct SimulatedBus {
    sense: ExpanderPin,
    state: Mutex<SimState>,
}

impl SimulatedBus {
    pub fn new(sense: ExpanderPin) -> Self {
        Self {
            sense,
            state: Mutex::new(SimState::default()),
        }
    }

    /// Wire a pin through to the sense line.
    pub fn wire(&self, pin: ExpanderPin) {
        self.state.lock().wired.insert(pin);
    }

    /// Snapshot of the journaled operations so far.
    pub fn journal(&self) -> Vec<BusEvent> {
        self.state.lock().journal.clone()
    }

    /// Pins that were driven high, in journal order.
    pub fn driven_high(&self) -> Vec<ExpanderPin> {
        self.state
            .lock()
            .journal
            .iter()
            .filter_map(|ev| match ev {
                BusEvent::Drive { pin, level: true } => Some(*pin),
                _ => None,
            })
            .collect()
    }
}

impl PinBus for SimulatedBus {
    fn set_output(&self, pin: ExpanderPin, level: bool) -> Result<()> {
        let mut state = self.state.lock();
        if level {
            state.driven.insert(pin);
        } else {
            state.driven.remove(&pin);
        }
        state.journal.push(BusEvent::Drive { pin, level });
        Ok(())
    }

    fn read_input(&self, pin: ExpanderPin) -> Result<bool> {
        let mut state = self.state.lock();
        // Only the shared sense line ever observes continuity: it reads
        // high while any wired pin is being driven.
        let level = pin == self.sense && state.driven.iter().any(|p| state.wired.contains(p));
        state.journal.push(BusEvent::Sense { pin, level });
        Ok(level)
    }
}
