//! Prompt engineering for narrative report drafting

use ddr_domain::MergedRecord;
use serde_json::to_string_pretty;

/// The seven fixed section headings of a DDR, in order
///
/// Renderers locate each heading's uppercase literal text and take the span
/// up to the next recognized heading.
pub const SECTION_HEADINGS: [&str; 7] = [
    "PROPERTY ISSUE SUMMARY",
    "AREA-WISE OBSERVATIONS",
    "PROBABLE ROOT CAUSE",
    "SEVERITY ASSESSMENT",
    "RECOMMENDED ACTIONS",
    "ADDITIONAL NOTES",
    "MISSING OR UNCLEAR INFORMATION",
];

/// Fallback sentence the model must emit when no root cause is explicit
pub const ROOT_CAUSE_FALLBACK: &str =
    "Root cause not explicitly specified in the provided documents.";

/// Disclaimer emitted when thermal data is present but not area-mapped
pub const THERMAL_DISCLAIMER: &str = "Thermal imaging contains temperature readings; \
however, specific area mapping is not available, therefore direct correlation cannot be confirmed.";

/// Build the complete drafting prompt for a merged record
pub fn build_report_prompt(merged: &MergedRecord) -> String {
    // Serialization of an in-memory record cannot fail; fall back to the
    // compact debug form if it ever does.
    let data = to_string_pretty(merged).unwrap_or_else(|_| format!("{:?}", merged));

    format!(
        "Generate the Detailed Diagnostic Report (DDR) using the provided structured \
         inspection and thermal data.\n\
         \n\
         STRUCTURED DATA TO ANALYZE:\n\
         {data}\n\
         \n\
         {REPORT_POLICY}"
    )
}

/// The fixed policy block appended to every drafting prompt
const REPORT_POLICY: &str = r#"RULES

Do NOT invent new facts.
Do NOT infer root causes unless explicitly mentioned.
If root cause is not explicitly stated, write: "Root cause not explicitly specified in the provided documents."

You ARE allowed to reason logically from observed findings.
You ARE allowed to assign severity based on impact described in findings.
You ARE allowed to suggest practical corrective actions based on the identified issue.

Do NOT exaggerate severity.
Use neutral professional tone.
Output clean plain text only. No markdown symbols.

SEVERITY GUIDELINES

Assign severity based on inspection findings:

If active leakage, concealed plumbing issue, or continuous water flow -> High
If visible dampness, seepage, tile hollowness -> Moderate
If minor cosmetic defect without moisture indication -> Low
If insufficient data -> Not Available

Do NOT invent severity beyond evidence.
Explain reasoning clearly in 2-4 sentences per area.

RECOMMENDED ACTION GUIDELINES

You may recommend logical repair steps based on the observed issue.

Examples:
- Dampness -> investigate source, waterproofing repair, drying
- Concealed plumbing leakage -> open section, repair pipe, re-seal
- Crack in external wall -> structural inspection, sealing
- Tile hollowness -> remove and re-fix tiles

Do NOT assume hidden structural failure.
Do NOT add unverified causes.

THERMAL HANDLING

If thermal data exists but is not area-mapped, state:
"Thermal imaging contains temperature readings; however, specific area mapping is not available, therefore direct correlation cannot be confirmed."

Do NOT ignore thermal presence.

REQUIRED STRUCTURE

DETAILED DIAGNOSTIC REPORT (DDR)

PROPERTY ISSUE SUMMARY
Write 2-3 structured paragraphs summarizing overall condition and risk.

AREA-WISE OBSERVATIONS
For each area:
- Inspection Findings
- Thermal Findings
- Analysis (logical explanation of impact)

PROBABLE ROOT CAUSE
Only if explicitly mentioned.
Otherwise use required fallback sentence.

SEVERITY ASSESSMENT (WITH REASONING)
Assign level and explain logically.

RECOMMENDED ACTIONS
Provide practical corrective steps based on findings.

ADDITIONAL NOTES
Include limitations of document-based assessment.

MISSING OR UNCLEAR INFORMATION
List missing measurements or mapping gaps.

CRITICAL REQUIREMENTS

The report must show analytical thinking, not just restating data.
Do not leave severity and recommendations as "Not Available" if logical reasoning can be applied.
Only restrict yourself from inventing new causes.
Use neutral, professional language.
Output plain text only, no markdown formatting."#;

#[cfg(test)]
mod tests {
    use super::*;
    use ddr_domain::AreaRecord;

    fn merged() -> MergedRecord {
        let mut hall = AreaRecord::new("Hall");
        hall.inspection_findings
            .push("Skirting level dampness".to_string());
        MergedRecord { areas: vec![hall] }
    }

    #[test]
    fn test_prompt_embeds_structured_data() {
        let prompt = build_report_prompt(&merged());
        assert!(prompt.contains("\"area_name\": \"Hall\""));
        assert!(prompt.contains("Skirting level dampness"));
    }

    #[test]
    fn test_prompt_includes_all_section_headings() {
        let prompt = build_report_prompt(&merged());
        for heading in SECTION_HEADINGS {
            assert!(prompt.contains(heading), "missing heading {}", heading);
        }
    }

    #[test]
    fn test_prompt_includes_policy_sentences() {
        let prompt = build_report_prompt(&merged());
        assert!(prompt.contains(ROOT_CAUSE_FALLBACK));
        assert!(prompt.contains(THERMAL_DISCLAIMER));
        assert!(prompt.contains("Do NOT invent new facts."));
        assert!(prompt.contains("If insufficient data -> Not Available"));
    }
}
