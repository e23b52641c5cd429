//! Project directory layout
//!
//! A cabinet test project is a directory holding the three documents the
//! engine works with, plus an optional configuration override:
//!
//! - `connections.json`: per-mark connection graph (external ingestion)
//! - `iomap.json`: connector-to-expander bindings (static fixture wiring)
//! - `test_results.json`: the persisted result store
//! - `config.json`: optional timing/address overrides

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::config::TestConfig;
use crate::schedule::{ConnectionGraph, IoMap};

#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn connections_path(&self) -> PathBuf {
        self.root.join("connections.json")
    }

    pub fn iomap_path(&self) -> PathBuf {
        self.root.join("iomap.json")
    }

    pub fn results_path(&self) -> PathBuf {
        self.root.join("test_results.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn load_graph(&self) -> Result<ConnectionGraph> {
        ConnectionGraph::load(&self.connections_path())
    }

    pub fn load_iomap(&self) -> Result<IoMap> {
        IoMap::load(&self.iomap_path())
    }

    /// Load the project configuration, falling back to defaults when no
    /// `config.json` is present.
    pub fn load_config(&self) -> Result<TestConfig> {
        let path = self.config_path();
        if !path.exists() {
            log::debug!("No config override at {path:?}, using defaults");
            return Ok(TestConfig::default());
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {path:?}"))?;
        serde_json::from_str(&json).context("Failed to deserialize config")
    }
}
