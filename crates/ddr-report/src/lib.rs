//! DDR Report Drafting
//!
//! Turns a merged structured record into the final narrative Detailed
//! Diagnostic Report via one model call under a fixed policy block: no
//! invented facts, severity only from the ordinal rule table, remedies
//! only from the fixed example mapping, and plain prose under seven fixed
//! section headings.

#![warn(missing_docs)]

mod config;
mod drafter;
mod error;
mod prompt;

pub use config::DrafterConfig;
pub use drafter::ReportDrafter;
pub use error::{DraftError, RATE_LIMIT_GUIDANCE};
pub use prompt::{
    build_report_prompt, ROOT_CAUSE_FALLBACK, SECTION_HEADINGS, THERMAL_DISCLAIMER,
};
