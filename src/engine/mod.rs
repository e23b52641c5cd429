/// Continuity test engine
///
/// The protocol that drives one terminal to completion: probe the
/// expected expander line, fall back to an exhaustive address-space scan
/// on timeout, and merge the outcome into the persisted result store.
/// Collaborators (pin bus, operator prompt) are injected at construction.
pub mod orchestrator;
pub mod prober;
pub mod prompt;
pub mod scanner;

pub use orchestrator::{MarkSummary, TerminalOutcome, TestOrchestrator};
pub use prober::{probe, ProbeOutcome};
pub use prompt::{ConsolePrompt, OperatorPrompt};
pub use scanner::{scan, ScanCandidates, ScanOutcome};
