//! Routing between the single-chunk and multi-chunk paths.

use std::sync::Arc;

use tracing::{debug, info};

use super::multi::MultiChunkTranslator;
use super::prompts::PromptContext;
use super::single::SingleChunkTranslator;
use crate::chunkers::{calculate_chunk_size, RecursiveSplitter, TiktokenCounter, TokenCounter};
use crate::completion::Agents;
use crate::error::Result;
use crate::types::{PipelineConfig, TranslationMode, TranslationOutcome, TranslationRequest};

/// Translation entry point.
///
/// Holds one token counter shared with the splitter, so the chunking
/// decision and the chunk boundaries agree on what a token is.
pub struct Translator {
    counter: Arc<dyn TokenCounter>,
    splitter: RecursiveSplitter,
    single: SingleChunkTranslator,
    multi: MultiChunkTranslator,
}

impl Translator {
    /// Create a translator using the tiktoken encoding named in `config`.
    pub fn new(agents: Agents, config: &PipelineConfig) -> Result<Self> {
        let counter = TiktokenCounter::with_encoding(&config.encoding)?;
        Ok(Self::with_counter(agents, config, Arc::new(counter)))
    }

    /// Create a translator with a caller-supplied token counter.
    pub fn with_counter(
        agents: Agents,
        config: &PipelineConfig,
        counter: Arc<dyn TokenCounter>,
    ) -> Self {
        Self {
            splitter: RecursiveSplitter::new(counter.clone()),
            counter,
            single: SingleChunkTranslator::new(agents.clone()),
            multi: MultiChunkTranslator::new(agents, config.concurrency),
        }
    }

    /// Number of tokens in `text` under this translator's encoding.
    pub fn count_tokens(&self, text: &str) -> usize {
        self.counter.count_tokens(text)
    }

    /// Translate a validated request, returning every pass's output.
    ///
    /// Texts within the token budget are translated as one unit; longer
    /// texts are split into near-equal chunks that are each translated with
    /// the full text as context.
    pub async fn translate(&self, request: &TranslationRequest) -> Result<TranslationOutcome> {
        request.validate()?;

        let ctx = PromptContext::from_request(request);
        let max_tokens = request.max_tokens_per_chunk;
        let token_count = self.counter.count_tokens(&request.source_text);
        info!(
            token_count,
            max_tokens,
            encoding = self.counter.encoding_name(),
            "Starting translation"
        );

        if token_count <= max_tokens {
            let artifacts = self.single.translate(&ctx, &request.source_text).await?;
            return Ok(TranslationOutcome {
                mode: TranslationMode::SingleChunk,
                token_count,
                chunk_size: None,
                chunks: vec![artifacts],
            });
        }

        let chunk_size = calculate_chunk_size(token_count, max_tokens)?;
        let chunks = self.splitter.split(&request.source_text, chunk_size)?;
        debug!(chunk_size, chunks = chunks.len(), "Using multi-chunk translation");

        let artifacts = self.multi.translate(&ctx, &chunks).await?;
        Ok(TranslationOutcome {
            mode: TranslationMode::MultiChunk,
            token_count,
            chunk_size: Some(chunk_size),
            chunks: artifacts,
        })
    }

    /// Translate `source_text` and return only the final translation.
    pub async fn translate_text(
        &self,
        source_lang: &str,
        target_lang: &str,
        source_text: &str,
        country: &str,
        max_tokens_per_chunk: usize,
    ) -> Result<String> {
        let request = TranslationRequest::new(source_lang, target_lang, source_text)
            .with_country(country)
            .with_max_tokens(max_tokens_per_chunk);
        let outcome = self.translate(&request).await?;
        Ok(outcome.final_translation())
    }
}
