//! DDR Report Pipeline
//!
//! Orchestrates the full diagnostic-report workflow: two source documents
//! (a visual inspection report and a thermal imaging report) go through
//! text extraction, prompt budgeting, structured extraction, merging and
//! conflict detection, narrative drafting, and final rendering.
//!
//! The workflow is strictly sequential. A cooperative [`CancelToken`]
//! (re-exported from `ddr-domain`) is checked between stages so a run can
//! be stopped without killing an in-flight model call.
//!
//! # Example
//!
//! ```no_run
//! use ddr_pipeline::{Pipeline, PipelineConfig, PlainTextSource, TextFileRenderer, RunOutcome};
//! use ddr_domain::CancelToken;
//! use ddr_llm::MockProvider;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::new(
//!     Arc::new(MockProvider::default()),
//!     PlainTextSource::default(),
//!     TextFileRenderer::new("ddr.txt"),
//!     PipelineConfig::default(),
//! )?;
//!
//! let outcome = pipeline
//!     .run(Path::new("inspection.txt"), Path::new("thermal.txt"), &CancelToken::new())
//!     .await?;
//! if let RunOutcome::Completed(report) = outcome {
//!     println!("Report written to {}", report.output_path.display());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod pipeline;
mod render;
mod source;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pipeline::{Pipeline, RunOutcome, RunReport};
pub use render::{RenderError, ReportRenderer, TextFileRenderer};
pub use source::{DocumentSource, PlainTextSource, SourceError, DEFAULT_MAX_BYTES};
