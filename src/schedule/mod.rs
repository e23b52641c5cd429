//! Wiring schedule input models
//!
//! Read-only documents produced by the external schedule-ingestion step:
//! the per-mark connection graph and the connector-to-expander I/O map.
//! The engine never mutates these; absence of a mark in either document
//! means "nothing to test", not an error.

pub mod graph;
pub mod iomap;
pub mod terminal;

pub use graph::{Connection, ConnectionGraph};
pub use iomap::{IoBinding, IoMap};
pub use terminal::{normalize_terminal, FieldValue};
