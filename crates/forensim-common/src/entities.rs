/// Core value types shared by the metric engines, the network builder and the loaders.
/// All of them are plain immutable values; nothing here owns state across runs.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Sample key
// ---------------------------------------------------------------------------

/// Identifier of a forensic sample. Source tables use either integer sample
/// numbers or free-text labels, so both are kept without lossy conversion.
///
/// Ordering: numeric keys sort numerically and come before text keys,
/// which sort lexicographically. Every tie-break in the pipeline relies on it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleKey {
    Number(i64),
    Text(String),
}

impl SampleKey {
    /// Parse a raw table cell. Only canonical integers become `Number`,
    /// so "007" stays text and round-trips unchanged.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(n) if n.to_string() == trimmed => SampleKey::Number(n),
            _ => SampleKey::Text(trimmed.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SampleKey::Text(s) if s.is_empty())
    }
}

impl fmt::Display for SampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleKey::Number(n) => write!(f, "{n}"),
            SampleKey::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for SampleKey {
    fn from(n: i64) -> Self {
        SampleKey::Number(n)
    }
}

impl From<i32> for SampleKey {
    fn from(n: i32) -> Self {
        SampleKey::Number(i64::from(n))
    }
}

impl From<&str> for SampleKey {
    fn from(s: &str) -> Self {
        SampleKey::Text(s.to_string())
    }
}

impl From<String> for SampleKey {
    fn from(s: String) -> Self {
        SampleKey::Text(s)
    }
}

// ---------------------------------------------------------------------------
// Input rows
// ---------------------------------------------------------------------------

/// One measured substance in one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionRecord {
    pub sample: SampleKey,
    pub substance: String,
    /// Relative peak area, in percent of the sample's total area.
    pub relative_area: f64,
}

impl CompositionRecord {
    pub fn new(sample: impl Into<SampleKey>, substance: impl Into<String>, relative_area: f64) -> Self {
        Self {
            sample: sample.into(),
            substance: substance.into(),
            relative_area,
        }
    }
}

/// One substance shared by a pair of samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoOccurrence {
    pub sample_a: SampleKey,
    pub sample_b: SampleKey,
    /// `None` models an empty cell in the source table.
    pub substance: Option<String>,
}

impl CoOccurrence {
    pub fn new(
        sample_a: impl Into<SampleKey>,
        sample_b: impl Into<SampleKey>,
        substance: impl Into<String>,
    ) -> Self {
        Self {
            sample_a: sample_a.into(),
            sample_b: sample_b.into(),
            substance: Some(substance.into()),
        }
    }
}

/// A single-metric score for an ordered sample pair, as found in
/// precomputed pair tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairScore {
    pub sample_a: SampleKey,
    pub sample_b: SampleKey,
    pub score: f64,
}

impl PairScore {
    pub fn new(sample_a: impl Into<SampleKey>, sample_b: impl Into<SampleKey>, score: f64) -> Self {
        Self {
            sample_a: sample_a.into(),
            sample_b: sample_b.into(),
            score,
        }
    }
}

/// Canonical key for an unordered pair: smaller key first.
pub fn unordered_pair(a: &SampleKey, b: &SampleKey) -> (SampleKey, SampleKey) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_integers_and_text_apart() {
        assert_eq!(SampleKey::parse("42"), SampleKey::Number(42));
        assert_eq!(SampleKey::parse(" 42 "), SampleKey::Number(42));
        assert_eq!(SampleKey::parse("007"), SampleKey::Text("007".into()));
        assert_eq!(SampleKey::parse("S-12"), SampleKey::Text("S-12".into()));
    }

    #[test]
    fn test_numbers_sort_numerically_before_text() {
        let mut keys = vec![
            SampleKey::from("b"),
            SampleKey::from(10),
            SampleKey::from("a"),
            SampleKey::from(9),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![SampleKey::from(9), SampleKey::from(10), SampleKey::from("a"), SampleKey::from("b")]
        );
    }

    #[test]
    fn test_unordered_pair_is_orientation_free() {
        let a = SampleKey::from("x");
        let b = SampleKey::from("y");
        assert_eq!(unordered_pair(&a, &b), unordered_pair(&b, &a));
    }

    #[test]
    fn test_sample_key_serializes_untagged() {
        let json = serde_json::to_string(&vec![SampleKey::from(3), SampleKey::from("S1")]).unwrap();
        assert_eq!(json, r#"[3,"S1"]"#);
    }
}
