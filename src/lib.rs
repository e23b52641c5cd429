//! Loomcheck is a continuity test engine for electrical cabinet wiring
//! looms.
//!
//! For each expected cable connection of a wiring schedule, the engine
//! energizes one connector terminal through a hardware I/O expander and
//! senses whether the expected return path closes. When it does not, it
//! exhaustively probes the remaining address space to locate the line
//! actually wired. Outcomes merge into a resumable, persisted test record
//! per cabinet.
//!
//! Schedule ingestion, UI rendering, and the I2C transport itself are
//! external collaborators: the engine consumes them through the
//! [`hardware::PinBus`] and [`engine::OperatorPrompt`] seams and the
//! read-only schedule documents.

pub mod boot;
#[doc(hidden)]
pub mod cli;
pub mod core;
pub mod engine;
pub mod hardware;
pub mod schedule;

pub use crate::core::{Project, ResultStore, TerminalResult, TestConfig};
pub use engine::{MarkSummary, OperatorPrompt, TerminalOutcome, TestOrchestrator};
pub use hardware::{ExpanderPin, PinBus};
