//! Three-pass translation of a text as one unit.

use tracing::{debug, info};

use super::prompts::{self, PromptContext};
use crate::completion::Agents;
use crate::error::{PassScope, Result, Stage, TranslationError};
use crate::types::ChunkArtifacts;

/// Translates a whole text with translate → reflect → improve, no chunking.
pub struct SingleChunkTranslator {
    agents: Agents,
}

impl SingleChunkTranslator {
    pub fn new(agents: Agents) -> Self {
        Self { agents }
    }

    /// Run the three passes in order. The first failure aborts the rest.
    pub async fn translate(&self, ctx: &PromptContext<'_>, source_text: &str) -> Result<ChunkArtifacts> {
        info!(
            source_lang = ctx.source_lang,
            target_lang = ctx.target_lang,
            "Translating text as a single chunk"
        );

        let initial_translation = self
            .agents
            .translator
            .ask(prompts::initial_translation(ctx, source_text))
            .await
            .map_err(|e| fail(Stage::InitialTranslation, e))?;
        debug!(len = initial_translation.len(), "Initial translation done");

        let reflection = self
            .agents
            .reviewer
            .ask(prompts::reflection(ctx, source_text, &initial_translation))
            .await
            .map_err(|e| fail(Stage::Reflection, e))?;
        debug!(len = reflection.len(), "Reflection done");

        let final_translation = self
            .agents
            .reviewer
            .ask(prompts::improvement(
                ctx,
                source_text,
                &initial_translation,
                &reflection,
            ))
            .await
            .map_err(|e| fail(Stage::Improvement, e))?;
        debug!(len = final_translation.len(), "Improvement done");

        Ok(ChunkArtifacts {
            source: source_text.to_string(),
            initial_translation,
            reflection,
            final_translation,
        })
    }
}

fn fail(stage: Stage, source: crate::completion::CompletionError) -> TranslationError {
    TranslationError::completion(stage, PassScope::WholeText, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::completion::{Agent, CompletionError, MockCompletion, ModelSettings};

    /// Answers by pass, identified from the prompt's XML sections.
    fn staged_mock() -> MockCompletion {
        MockCompletion::new(|request| {
            let prompt = &request.prompt;
            if prompt.contains("<EXPERT_SUGGESTIONS>") {
                Ok("final".to_string())
            } else if prompt.contains("<TRANSLATION>") {
                Ok("critique".to_string())
            } else {
                Ok("draft".to_string())
            }
        })
    }

    fn agent(mock: &Arc<MockCompletion>, model: &str) -> Agent {
        Agent::new(
            mock.clone(),
            ModelSettings {
                model: model.to_string(),
                ..ModelSettings::default()
            },
        )
    }

    #[tokio::test]
    async fn test_three_passes_in_order() {
        let mock = Arc::new(staged_mock());
        let translator = SingleChunkTranslator::new(Agents::single(agent(&mock, "m")));
        let ctx = PromptContext::new("English", "German", "Austria");

        let artifacts = translator.translate(&ctx, "Good evening").await.unwrap();
        assert_eq!(artifacts.source, "Good evening");
        assert_eq!(artifacts.initial_translation, "draft");
        assert_eq!(artifacts.reflection, "critique");
        assert_eq!(artifacts.final_translation, "final");

        let requests = mock.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[1].prompt.contains("<TRANSLATION>\ndraft\n</TRANSLATION>"));
        assert!(requests[1].prompt.contains("colloquially spoken in Austria"));
        assert!(requests[2]
            .prompt
            .contains("<EXPERT_SUGGESTIONS>\ncritique\n</EXPERT_SUGGESTIONS>"));
    }

    #[tokio::test]
    async fn test_reviewer_handles_reflection_and_improvement() {
        let translator_mock = Arc::new(staged_mock());
        let reviewer_mock = Arc::new(staged_mock());
        let translator = SingleChunkTranslator::new(Agents::with_reviewer(
            agent(&translator_mock, "translator-model"),
            agent(&reviewer_mock, "reviewer-model"),
        ));
        let ctx = PromptContext::new("English", "German", "");

        translator.translate(&ctx, "Hello").await.unwrap();

        assert_eq!(translator_mock.call_count(), 1);
        assert_eq!(reviewer_mock.call_count(), 2);
        assert!(reviewer_mock
            .requests()
            .iter()
            .all(|r| r.model == "reviewer-model"));
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_passes() {
        let mock = Arc::new(MockCompletion::new(|request| {
            if request.prompt.contains("<TRANSLATION>") {
                Err(CompletionError::Provider("timeout".to_string()))
            } else {
                Ok("draft".to_string())
            }
        }));
        let translator = SingleChunkTranslator::new(Agents::single(agent(&mock, "m")));
        let ctx = PromptContext::new("English", "German", "");

        let err = translator.translate(&ctx, "Hello").await.unwrap_err();
        match err {
            TranslationError::Completion { stage, scope, .. } => {
                assert_eq!(stage, Stage::Reflection);
                assert_eq!(scope, PassScope::WholeText);
            }
            other => panic!("unexpected error: {other}"),
        }
        // The improvement pass never ran.
        assert_eq!(mock.call_count(), 2);
    }
}
