//! DDR Extraction Client
//!
//! Converts unstructured inspection report text into structured area
//! records using a generative text model under a strict output-format
//! contract.
//!
//! # Architecture
//!
//! ```text
//! Raw text → Chunker → Prompt → Model → Repairer/Parser → ExtractionRecord
//! ```
//!
//! # Key Features
//!
//! - **Chunking**: bounded, overlapping windows for arbitrarily long text
//! - **Prompt Engineering**: strict JSON-only output contract
//! - **Response Repair**: fenced-block extraction, trailing-comma and
//!   comment stripping, truncation recovery
//! - **Shape Validation**: whole-record rejection of malformed extractions
//! - **Bounded Retries**: format/validation failures consume attempts;
//!   rate-limit and timeout failures surface immediately
//!
//! # Example Usage
//!
//! ```
//! use ddr_extract::{Extractor, ExtractorConfig};
//! use ddr_domain::CancelToken;
//! use ddr_llm::MockProvider;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Arc::new(MockProvider::new(
//!     r#"{"areas": [{"area_name": "Hall", "inspection_findings": [],
//!         "thermal_findings": [], "conflicts": [], "missing_info": []}]}"#,
//! ));
//! let extractor = Extractor::new(provider, ExtractorConfig::default());
//!
//! let record = extractor
//!     .extract("inspection text", "thermal text", &CancelToken::new())
//!     .await?;
//! assert_eq!(record.areas[0].area_name, "Hall");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod chunking;
mod config;
mod error;
mod extractor;
mod parser;
mod prompt;

pub use chunking::{TextChunker, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
pub use config::ExtractorConfig;
pub use error::{ExtractError, RATE_LIMIT_GUIDANCE};
pub use extractor::Extractor;
pub use parser::{extract_json, is_valid_extraction, parse_extraction, repair_json};
pub use prompt::PromptBuilder;
