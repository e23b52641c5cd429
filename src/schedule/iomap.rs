//! Connector-to-expander I/O map

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::hardware::ExpanderPin;

/// Static binding of a connector pin to a physical expander line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoBinding {
    /// Connector designation, used when reporting discovered miswires.
    pub connector: String,
    pub connector_pin: u32,
    pub expander_address: u8,
    pub expander_pin: u8,
}

impl IoBinding {
    pub fn expander(&self) -> ExpanderPin {
        ExpanderPin::new(self.expander_address, self.expander_pin)
    }
}

/// Ordered binding lists keyed by mark.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IoMap {
    marks: BTreeMap<String, Vec<IoBinding>>,
}

impl IoMap {
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read I/O map from {path:?}"))?;
        let map = serde_json::from_str(&json).context("Failed to deserialize I/O map")?;
        log::debug!("📂 Loaded I/O map from {path:?}");
        Ok(map)
    }

    /// Bindings reachable from a mark. An unknown mark simply has none.
    pub fn bindings_for(&self, mark: &str) -> &[IoBinding] {
        self.marks
            .get(mark)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    /// Binding for a connector pin within one mark's list.
    pub fn binding_for_pin(&self, mark: &str, connector_pin: u32) -> Option<&IoBinding> {
        self.bindings_for(mark)
            .iter()
            .find(|b| b.connector_pin == connector_pin)
    }

    /// Every binding in the map, in deterministic mark order.
    pub fn all_bindings(&self) -> impl Iterator<Item = &IoBinding> {
        self.marks.values().flat_map(|list| list.iter())
    }

    /// Inverse lookup: first binding anywhere in the map that sits on the
    /// given expander line. Mark order is deterministic, then document
    /// order within a mark.
    pub fn binding_for_expander(&self, pin: ExpanderPin) -> Option<&IoBinding> {
        self.all_bindings().find(|b| b.expander() == pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IoMap {
        serde_json::from_str(
            r#"{
                "10CON1": [
                    {"connector": "10CON1", "connector_pin": 5,
                     "expander_address": 33, "expander_pin": 3}
                ],
                "21C1": [
                    {"connector": "C9", "connector_pin": 4,
                     "expander_address": 35, "expander_pin": 9}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn forward_lookup_matches_connector_pin() {
        let map = sample();
        let binding = map.binding_for_pin("10CON1", 5).unwrap();
        assert_eq!(binding.expander(), ExpanderPin::new(0x21, 3));
        assert!(map.binding_for_pin("10CON1", 6).is_none());
        assert!(map.binding_for_pin("99CON9", 5).is_none());
    }

    #[test]
    fn inverse_lookup_searches_all_marks() {
        let map = sample();
        let binding = map.binding_for_expander(ExpanderPin::new(0x23, 9)).unwrap();
        assert_eq!(binding.connector, "C9");
        assert_eq!(binding.connector_pin, 4);
        assert!(map.binding_for_expander(ExpanderPin::new(0x24, 1)).is_none());
    }
}
