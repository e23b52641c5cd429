//! Per-mark connection graph

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::terminal::FieldValue;

/// One expected cable connection leaving a mark.
///
/// The ingestion step writes every schedule row twice (once per
/// direction), so the graph is bidirectional by construction. Cells the
/// schedule left blank arrive as `null` or are absent entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    #[serde(default)]
    pub from_terminal: Option<FieldValue>,
    #[serde(default)]
    pub to_part: Option<FieldValue>,
    #[serde(default)]
    pub to_mark: Option<FieldValue>,
    #[serde(default)]
    pub to_terminal: Option<FieldValue>,
}

impl Connection {
    /// Whether this connection names a real target. Connections without a
    /// target mark or part are never tested and never recorded.
    pub fn has_target(&self) -> bool {
        let present = |field: &Option<FieldValue>| {
            field.as_ref().map(|v| !v.is_missing()).unwrap_or(false)
        };
        present(&self.to_mark) && present(&self.to_part)
    }
}

/// Ordered connection lists keyed by mark.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionGraph {
    marks: BTreeMap<String, Vec<Connection>>,
}

impl ConnectionGraph {
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read connection graph from {path:?}"))?;
        let graph =
            serde_json::from_str(&json).context("Failed to deserialize connection graph")?;
        log::debug!("📂 Loaded connection graph from {path:?}");
        Ok(graph)
    }

    /// Connections expected for a mark, `None` when the mark is unknown.
    pub fn connections_for(&self, mark: &str) -> Option<&[Connection]> {
        self.marks.get(mark).map(|list| list.as_slice())
    }

    pub fn marks(&self) -> impl Iterator<Item = &str> {
        self.marks.keys().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_target_fields_disable_the_connection() {
        let json = r#"{
            "10CON1": [
                {"from_terminal": 5, "to_part": "-X1", "to_mark": "21C1", "to_terminal": 2},
                {"from_terminal": 6, "to_part": null, "to_mark": null, "to_terminal": null},
                {"from_terminal": 7}
            ]
        }"#;
        let graph: ConnectionGraph = serde_json::from_str(json).unwrap();
        let conns = graph.connections_for("10CON1").unwrap();
        assert!(conns[0].has_target());
        assert!(!conns[1].has_target());
        assert!(!conns[2].has_target());
    }

    #[test]
    fn unknown_mark_is_not_an_error() {
        let graph = ConnectionGraph::default();
        assert!(graph.connections_for("99CON9").is_none());
    }
}
