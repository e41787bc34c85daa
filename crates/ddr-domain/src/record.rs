//! Structured records produced by extraction and merging

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Placeholder name used when an area arrives without a usable `area_name`
pub const UNKNOWN_AREA: &str = "Unknown Area";

/// Findings grouped under one named room/zone of the inspected property
///
/// All four list fields are always present as sequences. Insertion order is
/// first-seen order and is preserved through merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaRecord {
    /// Merge key; case-preserving, non-empty after normalization
    pub area_name: String,

    /// Observations from the visual inspection report
    pub inspection_findings: Vec<String>,

    /// Observations from the thermal imaging report
    pub thermal_findings: Vec<String>,

    /// Detected contradictions between findings in this area
    pub conflicts: Vec<String>,

    /// Gaps in the source data named by the model
    pub missing_info: Vec<String>,
}

impl AreaRecord {
    /// Create an empty area record with the given name
    pub fn new(area_name: impl Into<String>) -> Self {
        Self {
            area_name: area_name.into(),
            inspection_findings: Vec::new(),
            thermal_findings: Vec::new(),
            conflicts: Vec::new(),
            missing_info: Vec::new(),
        }
    }

    /// Whether the area carries any evidentiary content
    ///
    /// Conflicts alone do not count: they are derived, not sourced.
    pub fn has_content(&self) -> bool {
        !self.inspection_findings.is_empty()
            || !self.thermal_findings.is_empty()
            || !self.missing_info.is_empty()
    }
}

/// One model-produced structured record for one inspection+thermal text pair
///
/// An extraction record with zero areas is invalid at the extraction
/// boundary; the parser rejects it before one is ever constructed there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// All areas mentioned in the source texts
    pub areas: Vec<AreaRecord>,
}

/// The canonical per-run union of extraction records, keyed by area name
///
/// Same shape as [`ExtractionRecord`]; the distinction is lifecycle, not
/// structure.
pub type MergedRecord = ExtractionRecord;

impl ExtractionRecord {
    /// Create a record with no areas
    pub fn empty() -> Self {
        Self { areas: Vec::new() }
    }

    /// Lossy conversion from loosely-typed JSON
    ///
    /// Defensive normalization pass: coerces a missing or wrong-typed
    /// `areas` to an empty sequence, drops area elements that are not
    /// objects, resets absent or non-array list fields to `[]`, and
    /// replaces a missing, non-string, or blank `area_name` with
    /// [`UNKNOWN_AREA`]. Never fails.
    pub fn from_value_lossy(value: &Value) -> Self {
        let areas = match value.get("areas").and_then(Value::as_array) {
            Some(areas) => areas,
            None => return Self::empty(),
        };

        let mut out = Vec::with_capacity(areas.len());
        for area in areas {
            let obj = match area.as_object() {
                Some(obj) => obj,
                None => {
                    warn!("skipping area that is not an object: {}", area);
                    continue;
                }
            };

            let area_name = match obj.get("area_name").and_then(Value::as_str) {
                Some(name) if !name.trim().is_empty() => name.to_string(),
                _ => UNKNOWN_AREA.to_string(),
            };

            let mut record = AreaRecord::new(area_name);
            record.inspection_findings = string_list(obj.get("inspection_findings"));
            record.thermal_findings = string_list(obj.get("thermal_findings"));
            record.conflicts = string_list(obj.get("conflicts"));
            record.missing_info = string_list(obj.get("missing_info"));
            out.push(record);
        }

        Self { areas: out }
    }
}

/// Coerce an optional JSON value into a list of strings
///
/// Non-array values become `[]`; non-string elements are stringified so a
/// model emitting a bare number inside a findings array does not lose data.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value.and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        None => Vec::new(),
    }
}
