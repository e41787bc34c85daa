//! Document text sources
//!
//! Raw document-to-text extraction is a black-box collaborator; this module
//! defines its boundary and ships a plain-text implementation. Page-aware
//! PDF extraction lives behind the same trait in the integrating
//! application.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Default maximum source document size (100 MB)
pub const DEFAULT_MAX_BYTES: u64 = 100 * 1024 * 1024;

/// Errors from a document source
#[derive(Error, Debug)]
pub enum SourceError {
    /// The document does not exist
    #[error("Document not found: {0}")]
    NotFound(PathBuf),

    /// The document exceeds the configured size limit
    #[error("Document too large: {size} bytes (max: {max})")]
    TooLarge {
        /// Actual size in bytes
        size: u64,
        /// Configured maximum in bytes
        max: u64,
    },

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for extracting best-effort text from a document
///
/// Implementations may return near-empty text for image-only documents;
/// the pipeline warns rather than fails on short output.
pub trait DocumentSource {
    /// Extract concatenated text from the document at `path`
    fn extract_text(&self, path: &Path) -> Result<String, SourceError>;
}

/// Plain UTF-8 text file source with a size safeguard
pub struct PlainTextSource {
    max_bytes: u64,
}

impl Default for PlainTextSource {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

impl PlainTextSource {
    /// Create a source with a custom size limit
    pub fn with_max_bytes(max_bytes: u64) -> Self {
        Self { max_bytes }
    }
}

impl DocumentSource for PlainTextSource {
    fn extract_text(&self, path: &Path) -> Result<String, SourceError> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(SourceError::Io(e)),
        };

        if metadata.len() > self.max_bytes {
            return Err(SourceError::TooLarge {
                size: metadata.len(),
                max: self.max_bytes,
            });
        }

        let text = fs::read_to_string(path)?;
        info!(
            "Extracted {} characters from {}",
            text.len(),
            path.display()
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_text_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "dampness on hall skirting").unwrap();

        let source = PlainTextSource::default();
        let text = source.extract_text(file.path()).unwrap();
        assert_eq!(text, "dampness on hall skirting");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let source = PlainTextSource::default();
        let err = source
            .extract_text(Path::new("/nonexistent/report.txt"))
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[test]
    fn test_oversized_file_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "0123456789").unwrap();

        let source = PlainTextSource::with_max_bytes(5);
        let err = source.extract_text(file.path()).unwrap_err();
        match err {
            SourceError::TooLarge { size, max } => {
                assert_eq!(size, 10);
                assert_eq!(max, 5);
            }
            other => panic!("Expected TooLarge, got {:?}", other),
        }
    }
}
