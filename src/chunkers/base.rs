//! Token counting shared by the sizing decision and the splitter.

use crate::error::{Result, TranslationError};
use crate::DEFAULT_ENCODING;

/// Token counter trait for counting tokens in text.
///
/// The orchestrator holds one counter and hands the same instance to the
/// splitter, so the "does this need chunking" decision and the chunk
/// boundaries are measured with the same encoding.
pub trait TokenCounter: Send + Sync {
    /// Count the number of tokens in the given text.
    fn count_tokens(&self, text: &str) -> usize;

    /// Name of the encoding, for logging.
    fn encoding_name(&self) -> &str;
}

/// Token counter backed by a tiktoken BPE encoding.
pub struct TiktokenCounter {
    bpe: tiktoken_rs::CoreBPE,
    encoding: &'static str,
}

impl TiktokenCounter {
    /// Create a counter with the default `cl100k_base` encoding (GPT-4/ChatGPT).
    pub fn new() -> Result<Self> {
        Self::with_encoding(DEFAULT_ENCODING)
    }

    /// Create a token counter with a specific encoding.
    ///
    /// Unknown encoding names are a configuration error.
    pub fn with_encoding(encoding_name: &str) -> Result<Self> {
        let (bpe, encoding) = match encoding_name {
            "cl100k_base" => (tiktoken_rs::cl100k_base(), "cl100k_base"),
            "p50k_base" => (tiktoken_rs::p50k_base(), "p50k_base"),
            "p50k_edit" => (tiktoken_rs::p50k_edit(), "p50k_edit"),
            "r50k_base" | "gpt2" => (tiktoken_rs::r50k_base(), "r50k_base"),
            other => {
                return Err(TranslationError::Config(format!(
                    "unknown token encoding '{}'",
                    other
                )))
            }
        };
        let bpe = bpe.map_err(|e| {
            TranslationError::Config(format!("failed to load encoding {}: {}", encoding, e))
        })?;
        Ok(Self { bpe, encoding })
    }
}

impl TokenCounter for TiktokenCounter {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    fn encoding_name(&self) -> &str {
        self.encoding
    }
}

/// One token per `char`. Makes budgets exact in tests.
#[cfg(test)]
pub(crate) struct CharCounter;

#[cfg(test)]
impl TokenCounter for CharCounter {
    fn count_tokens(&self, text: &str) -> usize {
        text.chars().count()
    }

    fn encoding_name(&self) -> &str {
        "chars"
    }
}
