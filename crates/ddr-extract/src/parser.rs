//! Locate, repair, and validate JSON embedded in model responses
//!
//! Models frequently wrap JSON in markdown fences, prepend commentary, emit
//! trailing commas, or truncate mid-array when they hit their output-token
//! ceiling. This module recovers a parseable payload from all of those, in
//! a fixed order of strategies, and validates the result against the
//! required extraction shape.

use crate::error::ExtractError;
use ddr_domain::ExtractionRecord;
use serde_json::Value;
use tracing::{debug, warn};

/// Maximum characters of the raw response included in diagnostics
const SAMPLE_CHARS: usize = 200;

/// Extract a JSON document from a free-form model response
///
/// Strategies, tried in order, each validated by parsing before being
/// accepted (directly or after repair):
/// 1. a fenced block labeled `json`
/// 2. any fenced block
/// 3. the span from the first `{` to the last `}`
/// 4. the raw text in its entirety
pub fn extract_json(raw: &str) -> Result<String, ExtractError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::Format("Empty response received".to_string()));
    }

    if let Some(block) = labeled_fence(trimmed) {
        if let Some(accepted) = accept(block, "```json block") {
            return Ok(accepted);
        }
    }

    if let Some(block) = any_fence(trimmed) {
        if let Some(accepted) = accept(block, "``` block") {
            return Ok(accepted);
        }
    }

    if let Some(span) = brace_span(trimmed) {
        if let Some(accepted) = accept(span, "brace span") {
            return Ok(accepted);
        }
    }

    if let Some(accepted) = accept(trimmed, "entire response") {
        return Ok(accepted);
    }

    let sample: String = trimmed.chars().take(SAMPLE_CHARS).collect();
    Err(ExtractError::Format(format!(
        "Failed to extract valid JSON from response. Response sample: {}",
        sample
    )))
}

/// Accept a candidate if it parses, directly or after repair
fn accept(candidate: &str, source: &str) -> Option<String> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return None;
    }

    if serde_json::from_str::<Value>(candidate).is_ok() {
        debug!("Extracted JSON from {}", source);
        return Some(candidate.to_string());
    }

    let repaired = repair_json(candidate);
    if serde_json::from_str::<Value>(&repaired).is_ok() {
        warn!("Repaired malformed JSON from {}", source);
        return Some(repaired);
    }

    None
}

/// Content of a ```json fenced block, if present
fn labeled_fence(text: &str) -> Option<&str> {
    let start = text.find("```json")? + "```json".len();
    let end = text[start..].find("```")? + start;
    Some(&text[start..end])
}

/// Content of the first fenced block of any kind, if present
fn any_fence(text: &str) -> Option<&str> {
    let mut start = text.find("```")? + 3;
    if text[start..].starts_with('\n') {
        start += 1;
    }
    let end = text[start..].find("```")? + start;
    Some(&text[start..end])
}

/// The span from the first `{` to the last `}`, if both exist in order
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Best-effort repair of common model JSON malformations
///
/// Strips `//` line comments and trailing commas, then closes unbalanced
/// brackets/braces (recovering output truncated at the token ceiling). Not
/// a general JSON fixer; the result may still fail to parse, in which case
/// it is returned as-is for the caller to report.
pub fn repair_json(input: &str) -> String {
    let step = strip_line_comments(input);
    let step = strip_trailing_commas(&step);
    let step = close_unbalanced(&step);
    strip_trailing_commas(&step)
}

/// Remove everything from `//` to end of line, outside string literals
fn strip_line_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Drop commas whose next non-whitespace character is `]` or `}`
fn strip_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
                if !matches!(next, Some(']') | Some('}')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Append closers for unmatched `[` and `{`, innermost first
fn close_unbalanced(input: &str) -> String {
    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in input.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '[' => stack.push(']'),
            '{' => stack.push('}'),
            ']' | '}' => {
                stack.pop();
            }
            _ => {}
        }
    }

    if stack.is_empty() && !in_string {
        return input.to_string();
    }

    let mut out = input.trim_end().to_string();
    if in_string {
        out.push('"');
    }
    while let Some(closer) = stack.pop() {
        out.push(closer);
    }

    debug!("Completed truncated JSON: appended {} closer(s)", {
        out.len() - input.trim_end().len()
    });
    out
}

/// Required list fields of every area object
const REQUIRED_LIST_FIELDS: [&str; 4] = [
    "inspection_findings",
    "thermal_findings",
    "conflicts",
    "missing_info",
];

/// Validate the structural shape of an extraction payload
///
/// The top-level value must be an object with a non-empty `areas` array;
/// every area must be an object with a non-blank string `area_name` and all
/// four list fields present as arrays (empty arrays are acceptable). Any
/// violation invalidates the whole record.
pub fn is_valid_extraction(value: &Value) -> bool {
    let areas = match value.get("areas").and_then(Value::as_array) {
        Some(areas) => areas,
        None => return false,
    };

    if areas.is_empty() {
        warn!("No areas found in extracted data");
        return false;
    }

    for area in areas {
        let obj = match area.as_object() {
            Some(obj) => obj,
            None => return false,
        };

        match obj.get("area_name").and_then(Value::as_str) {
            Some(name) if !name.trim().is_empty() => {}
            _ => {
                warn!("Area missing or invalid area_name: {}", area);
                return false;
            }
        }

        for field in REQUIRED_LIST_FIELDS {
            if !obj.get(field).map(Value::is_array).unwrap_or(false) {
                warn!(
                    "Area '{}' missing required list field '{}'",
                    obj.get("area_name").and_then(|v| v.as_str()).unwrap_or(""),
                    field
                );
                return false;
            }
        }
    }

    true
}

/// Parse a raw model response into a validated extraction record
pub fn parse_extraction(raw: &str) -> Result<ExtractionRecord, ExtractError> {
    let json_str = extract_json(raw)?;
    let value: Value = serde_json::from_str(&json_str)
        .map_err(|e| ExtractError::Format(format!("JSON parse error: {}", e)))?;

    if !is_valid_extraction(&value) {
        return Err(ExtractError::Validation(
            "Extraction payload does not match the required shape".to_string(),
        ));
    }

    Ok(ExtractionRecord::from_value_lossy(&value))
}
