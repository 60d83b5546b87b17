//! Translation request and outcome types.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TranslationError};
use crate::DEFAULT_MAX_TOKENS_PER_CHUNK;

fn default_max_tokens_per_chunk() -> usize {
    DEFAULT_MAX_TOKENS_PER_CHUNK
}

/// A request to translate one text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Source language name (e.g. "English")
    pub source_lang: String,

    /// Target language name (e.g. "Chinese")
    pub target_lang: String,

    /// Text to translate, already whitespace-normalized
    pub source_text: String,

    /// Country whose regional variety of the target language to aim for
    #[serde(default)]
    pub country: String,

    /// Token budget per chunk
    #[serde(default = "default_max_tokens_per_chunk")]
    pub max_tokens_per_chunk: usize,
}

impl TranslationRequest {
    /// Create a request with no country hint and the default token budget.
    pub fn new(source_lang: &str, target_lang: &str, source_text: &str) -> Self {
        Self {
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            source_text: source_text.to_string(),
            country: String::new(),
            max_tokens_per_chunk: DEFAULT_MAX_TOKENS_PER_CHUNK,
        }
    }

    /// Set the country hint.
    pub fn with_country(mut self, country: &str) -> Self {
        self.country = country.to_string();
        self
    }

    /// Set the per-chunk token budget.
    pub fn with_max_tokens(mut self, max_tokens_per_chunk: usize) -> Self {
        self.max_tokens_per_chunk = max_tokens_per_chunk;
        self
    }

    /// Reject requests that must not reach the completion endpoint.
    pub fn validate(&self) -> Result<()> {
        if self.source_text.trim().is_empty() {
            return Err(TranslationError::InvalidInput(
                "source text is empty".to_string(),
            ));
        }
        let source = self.source_lang.trim();
        let target = self.target_lang.trim();
        if source.is_empty() || target.is_empty() {
            return Err(TranslationError::InvalidInput(
                "source and target language are required".to_string(),
            ));
        }
        if source.to_lowercase() == target.to_lowercase() {
            return Err(TranslationError::InvalidInput(format!(
                "source and target language are both '{}'",
                source
            )));
        }
        if self.max_tokens_per_chunk == 0 {
            return Err(TranslationError::InvalidInput(
                "max tokens per chunk must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Strip whitespace-only lines from text pasted or extracted by a client.
pub fn normalize_source_text(text: &str) -> String {
    lazy_static::lazy_static! {
        static ref BLANK_LINES: regex::Regex = regex::Regex::new(r"(?m)^\s*$\n?")
            .expect("blank line pattern is valid");
    }
    BLANK_LINES.replace_all(text, "").into_owned()
}

/// Which path the orchestrator took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationMode {
    /// The whole text was translated as one unit
    SingleChunk,
    /// The text was split and each chunk translated with the rest as context
    MultiChunk,
}

impl std::fmt::Display for TranslationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslationMode::SingleChunk => write!(f, "single_chunk"),
            TranslationMode::MultiChunk => write!(f, "multi_chunk"),
        }
    }
}

/// The outputs of the three passes for one chunk (or the whole text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkArtifacts {
    pub source: String,
    pub initial_translation: String,
    pub reflection: String,
    pub final_translation: String,
}

/// Result of a `translate` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationOutcome {
    pub mode: TranslationMode,

    /// Token count of the source text
    pub token_count: usize,

    /// Target chunk size in tokens (multi-chunk only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,

    /// Per-chunk artifacts in source order
    pub chunks: Vec<ChunkArtifacts>,
}

impl TranslationOutcome {
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Initial translations concatenated in chunk order.
    pub fn initial_translation(&self) -> String {
        self.chunks
            .iter()
            .map(|c| c.initial_translation.as_str())
            .collect()
    }

    /// Per-chunk critiques, separated by a blank line.
    pub fn reflection(&self) -> String {
        self.chunks
            .iter()
            .map(|c| c.reflection.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Final translations concatenated in chunk order, with no separators.
    pub fn final_translation(&self) -> String {
        self.chunks
            .iter()
            .map(|c| c.final_translation.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn artifacts(n: usize) -> ChunkArtifacts {
        ChunkArtifacts {
            source: format!("s{n}"),
            initial_translation: format!("i{n}"),
            reflection: format!("r{n}"),
            final_translation: format!("f{n}"),
        }
    }

    #[test]
    fn test_validate_accepts_normal_request() {
        let request = TranslationRequest::new("English", "Spanish", "Hello").with_country("Mexico");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_text() {
        let request = TranslationRequest::new("English", "Spanish", "  \n ");
        assert!(request.validate().unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_validate_rejects_same_language() {
        let request = TranslationRequest::new("English", " english ", "Hello");
        assert!(request.validate().unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_validate_rejects_zero_budget() {
        let request = TranslationRequest::new("English", "Spanish", "Hello").with_max_tokens(0);
        assert!(request.validate().unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_request_defaults_when_deserialized() {
        let request: TranslationRequest = serde_json::from_str(
            r#"{"source_lang":"English","target_lang":"German","source_text":"Hi"}"#,
        )
        .unwrap();
        assert_eq!(request.country, "");
        assert_eq!(request.max_tokens_per_chunk, DEFAULT_MAX_TOKENS_PER_CHUNK);
    }

    #[test]
    fn test_normalize_removes_blank_lines() {
        let text = "First line\n\n   \nSecond line\n\t\nThird";
        assert_eq!(normalize_source_text(text), "First line\nSecond line\nThird");
    }

    #[test]
    fn test_outcome_joins_in_order() {
        let outcome = TranslationOutcome {
            mode: TranslationMode::MultiChunk,
            token_count: 30,
            chunk_size: Some(10),
            chunks: vec![artifacts(0), artifacts(1), artifacts(2)],
        };
        assert_eq!(outcome.chunk_count(), 3);
        assert_eq!(outcome.initial_translation(), "i0i1i2");
        assert_eq!(outcome.reflection(), "r0\n\nr1\n\nr2");
        assert_eq!(outcome.final_translation(), "f0f1f2");
    }
}
