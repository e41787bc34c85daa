//! Report document rendering
//!
//! Final paginated layout is a black-box collaborator; this module defines
//! its boundary and ships a plain-text renderer that writes the narrative
//! followed by an appendix of every merged area's fields.

use ddr_domain::MergedRecord;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors from a report renderer
#[derive(Error, Debug)]
pub enum RenderError {
    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Renderer-specific failure
    #[error("Render error: {0}")]
    Other(String),
}

/// Trait for rendering the final report document
pub trait ReportRenderer {
    /// Write the report and return the output path
    fn render(&self, narrative: &str, merged: &MergedRecord) -> Result<PathBuf, RenderError>;
}

/// Plain-text renderer: narrative followed by the structured-data appendix
pub struct TextFileRenderer {
    output_path: PathBuf,
}

impl TextFileRenderer {
    /// Create a renderer writing to the given path
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    /// The configured output path
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

impl ReportRenderer for TextFileRenderer {
    fn render(&self, narrative: &str, merged: &MergedRecord) -> Result<PathBuf, RenderError> {
        let mut out = String::with_capacity(narrative.len() + 512);
        out.push_str("DETAILED DIAGNOSTIC REPORT (DDR)\n\n");
        out.push_str(narrative.trim());
        out.push_str("\n\nAPPENDIX: EXTRACTED DATA\n");

        for area in &merged.areas {
            out.push_str(&format!("\nArea: {}\n", area.area_name));
            push_list(&mut out, "Inspection Findings", &area.inspection_findings);
            push_list(&mut out, "Thermal Findings", &area.thermal_findings);
            push_list(&mut out, "Identified Conflicts", &area.conflicts);
            push_list(&mut out, "Missing Information", &area.missing_info);
        }

        fs::write(&self.output_path, out)?;
        info!("Report written to {}", self.output_path.display());
        Ok(self.output_path.clone())
    }
}

fn push_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("{}:\n", title));
    for item in items {
        out.push_str(&format!("  - {}\n", item));
    }
}
