//! Recursive text splitter with hierarchical, lossless splitting.

use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

use super::base::TokenCounter;
use crate::error::{Result, TranslationError};

/// Recursive splitter that breaks text hierarchically.
///
/// This splitter tries multiple split strategies in order of preference:
/// 1. Double newlines (paragraphs)
/// 2. Single newlines
/// 3. Sentence endings (Latin and CJK)
/// 4. Clause punctuation
/// 5. Spaces (words)
/// 6. Grapheme clusters (last resort)
///
/// Separators stay attached to the end of the piece they terminate, so the
/// chunks concatenate back to the input byte for byte. Chunks never overlap.
pub struct RecursiveSplitter {
    counter: Arc<dyn TokenCounter>,
    /// Separators in order of preference (most to least preferred)
    separators: Vec<&'static str>,
}

impl RecursiveSplitter {
    /// Create a new recursive splitter with default separators.
    pub fn new(counter: Arc<dyn TokenCounter>) -> Self {
        Self {
            counter,
            separators: vec![
                "\n\n", // Paragraphs
                "\n",   // Lines
                ". ",   // Sentences
                "! ",   // Exclamations
                "? ",   // Questions
                "。",
                "！",
                "？",
                "; ",
                "；",
                ", ",
                "，",
                " ", // Words
            ],
        }
    }

    /// Create a recursive splitter with custom separators.
    pub fn with_separators(counter: Arc<dyn TokenCounter>, separators: Vec<&'static str>) -> Self {
        Self {
            counter,
            separators,
        }
    }

    /// Split `text` into ordered chunks of at most `chunk_size` tokens.
    ///
    /// Best effort: a single grapheme that alone exceeds the budget is
    /// emitted as its own chunk.
    pub fn split(&self, text: &str, chunk_size: usize) -> Result<Vec<String>> {
        if chunk_size == 0 {
            return Err(TranslationError::Config(
                "chunk size must be at least one token".to_string(),
            ));
        }
        if text.is_empty() {
            return Ok(vec![]);
        }

        let chunks = self.recursive_split(text, chunk_size, 0);
        tracing::debug!(
            chunk_size,
            chunks = chunks.len(),
            encoding = self.counter.encoding_name(),
            "Split source text"
        );
        Ok(chunks)
    }

    /// Recursively split text using the separator hierarchy.
    fn recursive_split(&self, text: &str, chunk_size: usize, separator_index: usize) -> Vec<String> {
        if text.is_empty() {
            return vec![];
        }

        // If text fits in a single chunk, return it
        if self.counter.count_tokens(text) <= chunk_size {
            return vec![text.to_string()];
        }

        // If we've exhausted all separators, split by graphemes
        if separator_index >= self.separators.len() {
            return self.split_by_graphemes(text, chunk_size);
        }

        let separator = self.separators[separator_index];
        let pieces: Vec<&str> = text.split_inclusive(separator).collect();

        // If we only got one piece, try the next separator
        if pieces.len() <= 1 {
            return self.recursive_split(text, chunk_size, separator_index + 1);
        }

        // Merge pieces into chunks
        let mut chunks = Vec::new();
        let mut current_chunk = String::new();

        for piece in pieces {
            if current_chunk.is_empty() {
                if self.counter.count_tokens(piece) <= chunk_size {
                    current_chunk.push_str(piece);
                } else {
                    chunks.extend(self.recursive_split(piece, chunk_size, separator_index + 1));
                }
                continue;
            }

            let candidate_len = current_chunk.len();
            current_chunk.push_str(piece);
            if self.counter.count_tokens(&current_chunk) <= chunk_size {
                continue;
            }

            // Current chunk is full
            current_chunk.truncate(candidate_len);
            chunks.push(std::mem::take(&mut current_chunk));

            // Check if this piece itself is too large
            if self.counter.count_tokens(piece) > chunk_size {
                chunks.extend(self.recursive_split(piece, chunk_size, separator_index + 1));
            } else {
                current_chunk.push_str(piece);
            }
        }

        // Don't forget the last chunk
        if !current_chunk.is_empty() {
            chunks.push(current_chunk);
        }

        chunks
    }

    /// Split text by grapheme clusters (last resort).
    fn split_by_graphemes(&self, text: &str, chunk_size: usize) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut start = 0;
        let mut end = 0;

        for (offset, grapheme) in text.grapheme_indices(true) {
            let next_end = offset + grapheme.len();
            if end > start && self.counter.count_tokens(&text[start..next_end]) > chunk_size {
                chunks.push(text[start..end].to_string());
                start = end;
            }
            end = next_end;
        }

        if start < text.len() {
            chunks.push(text[start..].to_string());
        }

        chunks
    }
}
