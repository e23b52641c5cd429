//! Persisted test-result store
//!
//! The store is the sole durable record of a cabinet's test outcomes. It
//! is created once by project initialization, read at orchestrator start,
//! merged in memory while a mark runs, and written back wholesale when
//! the run completes. Merging is idempotent: a terminal key appears at
//! most once per mark and repeated merges converge.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Outcome recorded for one terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalResult {
    pub terminal: String,
    pub passed: bool,
    /// Human-readable description of the expected target, or of the
    /// connection actually discovered by the fallback scan.
    pub answer: String,
}

/// Rolled-up status of one mark's result sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkStatus {
    Pass,
    Fail,
    Missing,
}

impl MarkStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            MarkStatus::Pass => "✅",
            MarkStatus::Fail => "❌",
            MarkStatus::Missing => "⚪",
        }
    }

    pub fn of(results: &[TerminalResult]) -> Self {
        if results.is_empty() {
            MarkStatus::Missing
        } else if results.iter().all(|r| r.passed) {
            MarkStatus::Pass
        } else {
            MarkStatus::Fail
        }
    }
}

/// The persisted result document for one cabinet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultStore {
    pub cabinet_name: String,
    pub test_results: BTreeMap<String, Vec<TerminalResult>>,
}

impl ResultStore {
    /// Fresh store with an empty result sequence per known mark.
    pub fn empty(cabinet_name: impl Into<String>, marks: impl IntoIterator<Item = String>) -> Self {
        Self {
            cabinet_name: cabinet_name.into(),
            test_results: marks.into_iter().map(|mark| (mark, Vec::new())).collect(),
        }
    }

    /// Load the store from disk. A missing file is fatal: the store must
    /// have been created by project initialization.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Result store not found at {path:?}; run `loomcheck init` first");
        }
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read result store from {path:?}"))?;
        let store: ResultStore =
            serde_json::from_str(&json).context("Failed to deserialize result store")?;
        log::debug!("📂 Loaded result store for cabinet '{}'", store.cabinet_name);
        Ok(store)
    }

    /// Replace the persisted file wholesale. The write goes through a
    /// sibling temp file and a rename so a crash never leaves a
    /// half-written store behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize result store")?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("Failed to write {tmp:?}"))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace result store at {path:?}"))?;
        log::debug!("💾 Saved result store to {path:?}");
        Ok(())
    }

    /// Merge one terminal result into a mark's sequence: update in place
    /// when the terminal key exists, append otherwise.
    pub fn merge(&mut self, mark: &str, result: TerminalResult) {
        let results = self.test_results.entry(mark.to_string()).or_default();
        if let Some(existing) = results.iter_mut().find(|r| r.terminal == result.terminal) {
            existing.passed = result.passed;
            existing.answer = result.answer;
        } else {
            results.push(result);
        }
    }

    /// Whether a terminal already has a passing entry for a mark.
    pub fn is_passed(&self, mark: &str, terminal: &str) -> bool {
        self.test_results
            .get(mark)
            .map(|results| {
                results
                    .iter()
                    .any(|r| r.terminal == terminal && r.passed)
            })
            .unwrap_or(false)
    }

    pub fn results_for(&self, mark: &str) -> &[TerminalResult] {
        self.test_results
            .get(mark)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }
}
