//! Text chunking for large documents
//!
//! Splits arbitrarily long text into bounded, overlapping windows suitable
//! for a single model call. Pure function of its input; indices are in
//! characters, not bytes, so multi-byte text never splits mid-codepoint.

use tracing::{info, warn};

/// Default maximum characters per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 4_000;

/// Default character overlap between consecutive chunks
pub const DEFAULT_OVERLAP: usize = 300;

/// Splits text into overlapping windows
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP)
    }
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Split text into overlapping chunks
    ///
    /// Text no longer than the chunk size is returned as a single element.
    /// Otherwise, each window is carved at up to `chunk_size` characters,
    /// backing off to the last sentence terminator when one lies past the
    /// window's midpoint. Consecutive chunks share up to `overlap`
    /// characters of context. Chunks are trimmed; empty ones are dropped.
    pub fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() <= self.chunk_size {
            return vec![text.to_string()];
        }

        let stride = std::cmp::max(1, self.chunk_size.saturating_sub(self.overlap));
        let max_iterations = chars.len() / stride + 10;

        let mut chunks = Vec::new();
        let mut current = 0usize;
        let mut iterations = 0usize;

        while current < chars.len() && iterations < max_iterations {
            iterations += 1;

            let mut end = std::cmp::min(current + self.chunk_size, chars.len());

            // Back off to a sentence boundary, but only past the midpoint
            // so windows never become implausibly short.
            if end < chars.len() {
                let window = &chars[current..end];
                if let Some(pos) = window.iter().rposition(|&c| c == '.') {
                    if pos > self.chunk_size / 2 {
                        end = current + pos + 1;
                    }
                }
            }

            let chunk: String = chars[current..end].iter().collect();
            let trimmed = chunk.trim();
            if !trimmed.is_empty() {
                chunks.push(trimmed.to_string());
            }

            // Overlap with the previous window; jump to the window end if
            // that would not advance the cursor.
            let next = end.saturating_sub(self.overlap);
            current = if next <= current { end } else { next };
        }

        if iterations >= max_iterations {
            warn!(
                "Chunking hit safety limit after {} chunks (text length {})",
                chunks.len(),
                chars.len()
            );
        }

        info!(
            "Split text into {} chunks (text length: {})",
            chunks.len(),
            chars.len()
        );
        chunks
    }
}
