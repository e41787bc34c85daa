//! DDR Domain Layer
//!
//! Core data model and trait interfaces for the Detailed Diagnostic Report
//! (DDR) generation pipeline. Defines the structured records exchanged
//! between the extraction, merge, and drafting stages, plus the boundary
//! traits implemented by infrastructure crates.
//!
//! ## Key Concepts
//!
//! - **Area Record**: findings grouped under a named room/zone of the
//!   inspected property
//! - **Extraction Record**: one model-produced structured record per
//!   inspection+thermal text pair
//! - **Merged Record**: the canonical per-run union of extraction records,
//!   keyed by area name
//! - **Cancel Token**: cooperative cancellation flag checked between
//!   pipeline stages
//!
//! Infrastructure implementations (model providers, document sources,
//! renderers) live in other crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cancel;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use cancel::CancelToken;
pub use record::{AreaRecord, ExtractionRecord, MergedRecord};
pub use traits::{FailureClass, FailureKind, GenerateOptions, TextGenerator};
