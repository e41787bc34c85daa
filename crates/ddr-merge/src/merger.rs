//! Merge and deduplicate structured extraction records

use crate::similarity::similarity_ratio;
use ddr_domain::{AreaRecord, ExtractionRecord, MergedRecord};
use tracing::debug;

/// Similarity ratio above which a later finding is dropped as a duplicate
pub const SIMILARITY_THRESHOLD: f64 = 0.85;

/// Contradiction term pairs checked against an area's combined findings
const CONTRADICTION_PAIRS: [(&str, &str); 5] = [
    ("moisture", "dry"),
    ("wet", "dry"),
    ("mold", "clean"),
    ("damage", "intact"),
    ("high temperature", "low temperature"),
];

/// Merge extraction records into a single canonical record
///
/// Iterates records in order and areas within each in order. The merge key
/// is the trimmed `area_name`, case-sensitive; first-seen casing wins. Each
/// list field is concatenated to the accumulator's and deduplicated after
/// every contribution, so insertion order stays first-seen order.
pub fn merge(records: &[ExtractionRecord]) -> MergedRecord {
    let mut areas: Vec<AreaRecord> = Vec::new();

    for record in records {
        for area in &record.areas {
            let key = area.area_name.trim();

            let idx = match areas.iter().position(|a| a.area_name == key) {
                Some(idx) => idx,
                None => {
                    areas.push(AreaRecord::new(key));
                    areas.len() - 1
                }
            };

            let entry = &mut areas[idx];
            entry.inspection_findings =
                dedup_findings(&concat(&entry.inspection_findings, &area.inspection_findings));
            entry.thermal_findings =
                dedup_findings(&concat(&entry.thermal_findings, &area.thermal_findings));
            entry.conflicts = dedup_findings(&concat(&entry.conflicts, &area.conflicts));
            entry.missing_info = dedup_findings(&concat(&entry.missing_info, &area.missing_info));
        }
    }

    debug!("Merged {} records into {} areas", records.len(), areas.len());
    MergedRecord { areas }
}

fn concat(a: &[String], b: &[String]) -> Vec<String> {
    a.iter().chain(b.iter()).cloned().collect()
}

/// Remove duplicate and near-duplicate items from a list
///
/// Iterates candidates in order; an item is dropped when its
/// case-insensitive similarity to an already-kept item exceeds
/// [`SIMILARITY_THRESHOLD`]. First-seen items win. O(n²) per call, which
/// is acceptable for per-area finding lists of tens of items.
pub fn dedup_findings(items: &[String]) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();
    let mut kept_lower: Vec<String> = Vec::new();

    for item in items {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            continue;
        }

        let lowered = trimmed.to_lowercase();
        let is_duplicate = kept_lower
            .iter()
            .any(|existing| similarity_ratio(&lowered, existing) > SIMILARITY_THRESHOLD);

        if !is_duplicate {
            kept.push(trimmed.to_string());
            kept_lower.push(lowered);
        }
    }

    kept
}

/// Detect crude term-pair contradictions within one area
///
/// Concatenates all inspection and thermal findings into one lowercase
/// string and reports every pair from the fixed table whose terms both
/// appear as substrings. A co-occurrence heuristic, not semantic analysis:
/// false positives are expected and surfaced as human-reviewable notes.
pub fn detect_conflicts(area: &AreaRecord) -> Vec<String> {
    let combined = area
        .inspection_findings
        .iter()
        .chain(area.thermal_findings.iter())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut conflicts = Vec::new();
    for (term1, term2) in CONTRADICTION_PAIRS {
        if combined.contains(term1) && combined.contains(term2) {
            let message = format!(
                "Potential contradiction: '{}' and '{}' mentioned",
                term1, term2
            );
            if !conflicts.contains(&message) {
                conflicts.push(message);
            }
        }
    }

    conflicts
}
