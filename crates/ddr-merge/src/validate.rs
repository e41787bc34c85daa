//! Advisory completeness checks on merged records

use ddr_domain::MergedRecord;

/// Check a merged record for completeness issues
///
/// Advisory only: never fails, used for logging. Flags areas without a
/// usable name and areas carrying no evidentiary content (no inspection
/// findings, no thermal findings, and no missing-info entries). Does not
/// block report generation.
pub fn validate_completion(record: &MergedRecord) -> (bool, Vec<String>) {
    let mut issues = Vec::new();

    if record.areas.is_empty() {
        issues.push("No areas found in data".to_string());
        return (false, issues);
    }

    for (idx, area) in record.areas.iter().enumerate() {
        if area.area_name.trim().is_empty() {
            issues.push(format!("Area {} missing area_name", idx));
        }

        if !area.has_content() {
            issues.push(format!("Area '{}' has no findings", area.area_name));
        }
    }

    (issues.is_empty(), issues)
}
