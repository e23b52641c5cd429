//! Hardware pin collaborator seam
//!
//! The engine never talks to an I2C bus directly. It drives and senses
//! expander pins through the [`PinBus`] trait, which an embedding
//! application implements on top of its real transport. The in-tree
//! [`sim::SimulatedBus`] implementation backs the CLI simulation mode and
//! the test suite.

pub mod sim;

use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Number of I/O lines on a single expander device.
pub const PINS_PER_EXPANDER: u8 = 16;

/// A physical I/O line: expander bus address plus pin index.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ExpanderPin {
    pub address: u8,
    pub pin: u8,
}

impl ExpanderPin {
    pub fn new(address: u8, pin: u8) -> Self {
        Self { address, pin }
    }
}

impl fmt::Display for ExpanderPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}/{}", self.address, self.pin)
    }
}

/// Synchronous pin access provided by the embedding application.
///
/// Both operations are assumed fast relative to the engine's poll
/// intervals. Any fault is fatal for the run in progress, so
/// implementations should not retry internally.
pub trait PinBus: Send + Sync {
    /// Drive a pin as an output at the given level. Driving `false` also
    /// releases the pin back to its inactive/input state.
    fn set_output(&self, pin: ExpanderPin, level: bool) -> Result<()>;

    /// Read the current level of an input pin.
    fn read_input(&self, pin: ExpanderPin) -> Result<bool>;
}
