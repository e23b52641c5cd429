//! Per-mark test orchestration
//!
//! Sequences probe → fallback scan → merge across all terminals of one
//! mark. Terminals are processed strictly sequentially, which also
//! serializes all access to the shared expander bus; the result store is
//! written back exactly once, after the whole mark has been processed.

use std::path::Path;

use anyhow::Result;

use crate::core::{ResultStore, TerminalResult, TestConfig};
use crate::engine::prober::{probe, ProbeOutcome};
use crate::engine::prompt::OperatorPrompt;
use crate::engine::scanner::{scan, ScanOutcome};
use crate::hardware::PinBus;
use crate::schedule::{normalize_terminal, Connection, ConnectionGraph, FieldValue, IoMap};

/// Final state of one terminal within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalOutcome {
    /// A passing entry already existed; no hardware access occurred.
    SkippedAlreadyPassed,
    /// The connection names no target mark/part; nothing recorded.
    SkippedNoTarget,
    /// No usable terminal identifier or no matching I/O binding; a
    /// configuration gap, not a test failure.
    SkippedNoBinding,
    Passed,
    /// Probe timed out but the fallback scan located the actual line.
    FailedWithDetail,
    /// Probe timed out and the scan exhausted the address space.
    FailedNoDetail,
}

/// Counts reported after a mark's run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkSummary {
    pub probed: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl MarkSummary {
    fn record(&mut self, outcome: TerminalOutcome) {
        match outcome {
            TerminalOutcome::Passed => {
                self.probed += 1;
                self.passed += 1;
            }
            TerminalOutcome::FailedWithDetail | TerminalOutcome::FailedNoDetail => {
                self.probed += 1;
                self.failed += 1;
            }
            TerminalOutcome::SkippedAlreadyPassed
            | TerminalOutcome::SkippedNoTarget
            | TerminalOutcome::SkippedNoBinding => self.skipped += 1,
        }
    }
}

/// Drives one mark's terminals to completion against injected
/// collaborators.
pub struct TestOrchestrator<'a> {
    bus: &'a dyn PinBus,
    prompt: &'a dyn OperatorPrompt,
    config: &'a TestConfig,
}

impl<'a> TestOrchestrator<'a> {
    pub fn new(
        bus: &'a dyn PinBus,
        prompt: &'a dyn OperatorPrompt,
        config: &'a TestConfig,
    ) -> Self {
        Self {
            bus,
            prompt,
            config,
        }
    }

    /// Run every unresolved terminal of `mark`, merge the outcomes into
    /// `store`, and write the store back to `results_path`.
    pub async fn run_mark(
        &self,
        mark: &str,
        graph: &ConnectionGraph,
        iomap: &IoMap,
        store: &mut ResultStore,
        results_path: &Path,
    ) -> Result<MarkSummary> {
        let mut summary = MarkSummary::default();

        let Some(connections) = graph.connections_for(mark) else {
            log::info!("Mark '{mark}' not found in the connection graph, nothing to test");
            return Ok(summary);
        };
        if iomap.bindings_for(mark).is_empty() {
            log::info!("Mark '{mark}' has no I/O bindings, nothing to test");
            return Ok(summary);
        }

        log::info!(
            "🧪 Testing mark '{mark}' ({} expected connections)",
            connections.len()
        );

        for connection in connections {
            let outcome = self.run_terminal(mark, connection, iomap, store).await?;
            summary.record(outcome);
        }

        store.save(results_path)?;
        log::info!(
            "Mark '{mark}' done: {} passed, {} failed, {} skipped",
            summary.passed,
            summary.failed,
            summary.skipped
        );
        Ok(summary)
    }

    async fn run_terminal(
        &self,
        mark: &str,
        connection: &Connection,
        iomap: &IoMap,
        store: &mut ResultStore,
    ) -> Result<TerminalOutcome> {
        let Some(raw) = connection.from_terminal.as_ref() else {
            log::debug!("Connection on '{mark}' has no from-terminal, skipping");
            return Ok(TerminalOutcome::SkippedNoBinding);
        };
        let Some(pin_number) = normalize_terminal(raw) else {
            log::debug!("Terminal '{raw}' on '{mark}' is not a connector pin, skipping");
            return Ok(TerminalOutcome::SkippedNoBinding);
        };
        let terminal = pin_number.to_string();

        if store.is_passed(mark, &terminal) {
            log::debug!("Terminal {terminal} already passed, skipping");
            return Ok(TerminalOutcome::SkippedAlreadyPassed);
        }
        if !connection.has_target() {
            log::debug!("Terminal {terminal} has no target mark/part, skipping");
            return Ok(TerminalOutcome::SkippedNoTarget);
        }
        let Some(binding) = iomap.binding_for_pin(mark, pin_number) else {
            log::debug!("Terminal {terminal} has no I/O binding, skipping");
            return Ok(TerminalOutcome::SkippedNoBinding);
        };

        let to_mark = display_or(&connection.to_mark, "?");
        let to_part = display_or(&connection.to_part, "?");
        let to_terminal = display_or(&connection.to_terminal, "?");
        let expected_answer = format!("Should go to mark: {to_mark} and terminal {to_terminal}");

        self.prompt
            .present(
                &format!("Terminal {terminal}"),
                &format!("Test: mark {to_mark} ({to_part}), terminal {to_terminal}"),
                self.config.confirm_timeout(),
            )
            .await?;

        let probe_outcome = probe(
            self.bus,
            binding.expander(),
            self.config.sense_pin,
            self.config.probe_timeout(),
            self.config.poll_interval(),
        )
        .await?;

        let outcome = match probe_outcome {
            ProbeOutcome::Resolved => {
                self.prompt.update_state(true, false).await?;
                store.merge(
                    mark,
                    TerminalResult {
                        terminal: terminal.clone(),
                        passed: true,
                        answer: expected_answer,
                    },
                );
                TerminalOutcome::Passed
            }
            ProbeOutcome::TimedOut => {
                log::debug!(
                    "Terminal {terminal} timed out on {}, starting fallback scan",
                    binding.expander()
                );
                self.prompt.update_state(false, true).await?;

                let scanned = scan(
                    self.bus,
                    &self.config.expander_addresses,
                    self.config.sense_pin,
                    self.config.scan_settle(),
                )
                .await?;

                let (answer, outcome) = match scanned {
                    ScanOutcome::Found(found_pin) => match iomap.binding_for_expander(found_pin) {
                        Some(found) => (
                            format!(
                                "Different cable connected to this terminal: cable from connector {} pin {} is connected",
                                found.connector, found.connector_pin
                            ),
                            TerminalOutcome::FailedWithDetail,
                        ),
                        None => {
                            log::warn!(
                                "Scan hit {found_pin} has no I/O binding, reporting as not found"
                            );
                            (expected_answer, TerminalOutcome::FailedNoDetail)
                        }
                    },
                    ScanOutcome::NotFound => (expected_answer, TerminalOutcome::FailedNoDetail),
                };

                self.prompt.update_state(false, false).await?;
                store.merge(
                    mark,
                    TerminalResult {
                        terminal: terminal.clone(),
                        passed: false,
                        answer,
                    },
                );
                outcome
            }
        };

        // Settle pause between terminals, then take the prompt down.
        tokio::time::sleep(self.config.terminal_pause()).await;
        self.prompt.dismiss().await?;

        log::debug!("Terminal {terminal} resolved as {outcome:?}");
        Ok(outcome)
    }
}

fn display_or(field: &Option<FieldValue>, fallback: &str) -> String {
    match field {
        Some(value) if !value.is_missing() => value.to_string(),
        _ => fallback.to_string(),
    }
}
