//! Terminal identifier normalization
//!
//! Schedule documents are loose about cell types: a terminal may arrive as
//! a bare integer, a float that the ingestion step failed to narrow, a
//! digit-only string, or the `pin <N>` form used on connector columns.
//! All of them normalize to the same connector pin number, whose decimal
//! string is the storage key used everywhere else.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A raw schedule cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// A float cell may be a stand-in for "no value" when the ingestion
    /// step carried a NaN through.
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Float(f) if f.is_nan())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(n) => write!(f, "{n}"),
            FieldValue::Float(v) if v.fract() == 0.0 && v.is_finite() => {
                write!(f, "{}", *v as i64)
            }
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Normalize a raw terminal value to its connector pin number.
///
/// Accepted forms are a non-negative integer, a digit-only string, and
/// `pin <N>`. Anything else (including NaN floats) yields `None`, which
/// callers treat as a configuration gap rather than a test failure.
pub fn normalize_terminal(value: &FieldValue) -> Option<u32> {
    match value {
        FieldValue::Int(n) => u32::try_from(*n).ok(),
        FieldValue::Float(f) if f.is_finite() && f.fract() == 0.0 && *f >= 0.0 => {
            Some(*f as u32)
        }
        FieldValue::Float(_) => None,
        FieldValue::Text(s) => {
            let digits = s.strip_prefix("pin ").unwrap_or(s).trim();
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                digits.parse().ok()
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_all_accepted_forms_to_the_same_pin() {
        assert_eq!(normalize_terminal(&FieldValue::Int(7)), Some(7));
        assert_eq!(
            normalize_terminal(&FieldValue::Text("7".to_string())),
            Some(7)
        );
        assert_eq!(
            normalize_terminal(&FieldValue::Text("pin 7".to_string())),
            Some(7)
        );
        assert_eq!(normalize_terminal(&FieldValue::Float(7.0)), Some(7));
    }

    #[test]
    fn rejects_unparseable_forms() {
        assert_eq!(normalize_terminal(&FieldValue::Text("PE".to_string())), None);
        assert_eq!(
            normalize_terminal(&FieldValue::Text("pin x".to_string())),
            None
        );
        assert_eq!(normalize_terminal(&FieldValue::Float(f64::NAN)), None);
        assert_eq!(normalize_terminal(&FieldValue::Int(-3)), None);
    }

    #[test]
    fn nan_float_counts_as_missing() {
        assert!(FieldValue::Float(f64::NAN).is_missing());
        assert!(!FieldValue::Text("21C1".to_string()).is_missing());
    }

    #[test]
    fn display_narrows_whole_floats() {
        assert_eq!(FieldValue::Float(5.0).to_string(), "5");
        assert_eq!(FieldValue::Int(12).to_string(), "12");
        assert_eq!(FieldValue::Text("21C1".to_string()).to_string(), "21C1");
    }
}
