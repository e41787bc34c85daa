//! Prompt engineering for structured extraction

/// Builds the combined inspection+thermal extraction prompt
pub struct PromptBuilder {
    inspection_text: String,
    thermal_text: String,
    excerpt_chars: usize,
}

impl PromptBuilder {
    /// Create a new prompt builder
    ///
    /// `excerpt_chars` caps how much of each source text is embedded; the
    /// caller decides what subset of the documents to pass in.
    pub fn new(
        inspection_text: impl Into<String>,
        thermal_text: impl Into<String>,
        excerpt_chars: usize,
    ) -> Self {
        Self {
            inspection_text: inspection_text.into(),
            thermal_text: thermal_text.into(),
            excerpt_chars,
        }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let inspection = excerpt(&self.inspection_text, self.excerpt_chars);
        let thermal = excerpt(&self.thermal_text, self.excerpt_chars);

        format!(
            "Extract findings from inspection and thermal reports into structured JSON format.\n\
             \n\
             INSPECTION REPORT:\n\
             {inspection}\n\
             \n\
             THERMAL REPORT:\n\
             {thermal}\n\
             \n\
             TASK: Extract findings for each area/room mentioned in the reports.\n\
             \n\
             {OUTPUT_CONTRACT}"
        )
    }
}

/// Take at most `limit` characters from the front of `text`
fn excerpt(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// The strict output-format contract appended to every extraction prompt.
/// Field names here must match the serde field names on `AreaRecord`.
const OUTPUT_CONTRACT: &str = r#"CRITICAL RULES FOR JSON OUTPUT (MUST FOLLOW EXACTLY):
1. Return ONLY valid JSON - nothing else before or after, no markdown
2. Complete all fields - never leave arrays empty in the middle
3. All fields must have complete values - do not cut off or truncate
4. No trailing commas before ] or }
5. No comments or explanatory text in JSON
6. All strings use double quotes, properly escaped
7. All field names exactly as specified - case sensitive
8. Empty arrays should be: []
9. Never use null - use [] for empty arrays or "" for empty strings

REQUIRED JSON STRUCTURE (Complete Example):
{
  "areas": [
    {
      "area_name": "Hall",
      "inspection_findings": ["Skirting level Dampness", "Common Bathroom tile hollowness"],
      "thermal_findings": ["Temperature variation near door"],
      "conflicts": ["None observed"],
      "missing_info": []
    },
    {
      "area_name": "Kitchen",
      "inspection_findings": [],
      "thermal_findings": ["High temperature near stove"],
      "conflicts": [],
      "missing_info": ["Ventilation assessment"]
    }
  ]
}

VALIDATION CHECKLIST:
- "areas" array is complete and closed with ]
- Each area object has all 5 fields
- Each field (except area_name) is properly closed array with ]
- No incomplete arrays like "thermal_findings": [ without closing ]
- No trailing commas like ["item1", "item2",]
- Valid, parseable JSON

Return ONLY the complete, valid JSON. No explanations. No code blocks."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_both_sources() {
        let builder = PromptBuilder::new(
            "dampness on hall skirting",
            "temperature variation near door",
            3_000,
        );
        let prompt = builder.build();
        assert!(prompt.contains("dampness on hall skirting"));
        assert!(prompt.contains("temperature variation near door"));
        assert!(prompt.contains("INSPECTION REPORT:"));
        assert!(prompt.contains("THERMAL REPORT:"));
    }

    #[test]
    fn test_prompt_includes_output_contract() {
        let prompt = PromptBuilder::new("a", "b", 3_000).build();
        assert!(prompt.contains("Return ONLY valid JSON"));
        assert!(prompt.contains("\"area_name\""));
        assert!(prompt.contains("\"inspection_findings\""));
        assert!(prompt.contains("\"thermal_findings\""));
        assert!(prompt.contains("\"conflicts\""));
        assert!(prompt.contains("\"missing_info\""));
        assert!(prompt.contains("Never use null"));
    }

    #[test]
    fn test_source_texts_are_truncated() {
        let long = "x".repeat(10_000);
        let prompt = PromptBuilder::new(long.clone(), long, 3_000).build();
        assert!(!prompt.contains(&"x".repeat(3_001)));
        assert!(prompt.contains(&"x".repeat(3_000)));
    }

    #[test]
    fn test_excerpt_char_boundary() {
        let text = "данные".repeat(100);
        let cut = excerpt(&text, 10);
        assert_eq!(cut.chars().count(), 10);
    }
}
