//! DDR Merge Layer
//!
//! Combines structured extraction records into a single canonical record
//! per report run: deduplicates near-identical findings with a fuzzy
//! character-level similarity ratio, detects crude cross-source
//! contradictions, and runs advisory completeness checks.
//!
//! # Example
//!
//! ```
//! use ddr_domain::{AreaRecord, ExtractionRecord};
//! use ddr_merge::{merge, detect_conflicts};
//!
//! let mut hall = AreaRecord::new("Hall");
//! hall.inspection_findings.push("Skirting dampness".to_string());
//!
//! let merged = merge(&[ExtractionRecord { areas: vec![hall] }]);
//! assert_eq!(merged.areas.len(), 1);
//! assert!(detect_conflicts(&merged.areas[0]).is_empty());
//! ```

#![warn(missing_docs)]

mod merger;
mod similarity;
mod validate;

pub use merger::{dedup_findings, detect_conflicts, merge, SIMILARITY_THRESHOLD};
pub use similarity::similarity_ratio;
pub use validate::validate_completion;
