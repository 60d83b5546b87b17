//! Three-pass translation of a chunk sequence with cross-chunk context.

use std::future::Future;

use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use super::prompts::{self, PromptContext};
use crate::completion::{Agents, CompletionError};
use crate::error::{PassScope, Result, Stage, TranslationError};
use crate::types::ChunkArtifacts;

/// Translates chunks one at a time while showing the model the whole text.
///
/// Each pass covers every chunk before the next pass starts. Within a pass,
/// up to `concurrency` calls are in flight; results are written into
/// per-chunk slots so the output order never depends on completion order.
pub struct MultiChunkTranslator {
    agents: Agents,
    concurrency: usize,
}

impl MultiChunkTranslator {
    pub fn new(agents: Agents, concurrency: usize) -> Self {
        Self {
            agents,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run all three passes over `chunks` and return artifacts in chunk order.
    pub async fn translate(
        &self,
        ctx: &PromptContext<'_>,
        chunks: &[String],
    ) -> Result<Vec<ChunkArtifacts>> {
        let count = chunks.len();
        info!(
            chunks = count,
            concurrency = self.concurrency,
            source_lang = ctx.source_lang,
            target_lang = ctx.target_lang,
            "Translating text in chunks"
        );

        let translator = &self.agents.translator;
        let reviewer = &self.agents.reviewer;

        let initial = self
            .run_pass(Stage::InitialTranslation, count, move |i| {
                translator.ask(prompts::chunk_initial_translation(ctx, chunks, i))
            })
            .await?;

        let initial_ref = &initial;
        let reflections = self
            .run_pass(Stage::Reflection, count, move |i| {
                reviewer.ask(prompts::chunk_reflection(ctx, chunks, i, &initial_ref[i]))
            })
            .await?;

        let reflections_ref = &reflections;
        let finals = self
            .run_pass(Stage::Improvement, count, move |i| {
                reviewer.ask(prompts::chunk_improvement(
                    ctx,
                    chunks,
                    i,
                    &initial_ref[i],
                    &reflections_ref[i],
                ))
            })
            .await?;

        Ok(chunks
            .iter()
            .zip(initial)
            .zip(reflections)
            .zip(finals)
            .map(
                |(((source, initial_translation), reflection), final_translation)| ChunkArtifacts {
                    source: source.clone(),
                    initial_translation,
                    reflection,
                    final_translation,
                },
            )
            .collect())
    }

    /// Run one pass over `count` chunks, collecting results by index.
    ///
    /// The first failure drops every call still in flight.
    async fn run_pass<F, Fut>(&self, stage: Stage, count: usize, call: F) -> Result<Vec<String>>
    where
        F: Fn(usize) -> Fut,
        Fut: Future<Output = std::result::Result<String, CompletionError>>,
    {
        let mut slots: Vec<Option<String>> = vec![None; count];

        let mut pending = stream::iter(0..count)
            .map(|index| {
                let call = call(index);
                async move { (index, call.await) }
            })
            .buffer_unordered(self.concurrency);

        while let Some((index, result)) = pending.next().await {
            let output = result
                .map_err(|e| TranslationError::completion(stage, PassScope::Chunk(index), e))?;
            debug!(chunk = index, stage = %stage, "Chunk pass complete");
            slots[index] = Some(output);
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    TranslationError::Config(format!("{} pass left chunk {} empty", stage, index))
                })
            })
            .collect()
    }
}
