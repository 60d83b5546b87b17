//! Translate → reflect → improve pipeline.
//!
//! The [`Translator`] decides between translating a text as one unit and
//! splitting it into chunks, then hands the work to the matching translator.

mod multi;
mod orchestrator;
pub mod prompts;
mod single;

pub use multi::MultiChunkTranslator;
pub use orchestrator::Translator;
pub use prompts::{Prompt, PromptContext};
pub use single::SingleChunkTranslator;

/// Prompt inspection helpers shared by the pipeline test suites.
#[cfg(test)]
pub(crate) mod testing {
    use crate::completion::MockCompletion;

    fn between<'a>(text: &'a str, open: &str, close: &str) -> Option<&'a str> {
        let start = text.rfind(open)? + open.len();
        let end = text[start..].find(close)? + start;
        Some(&text[start..end])
    }

    /// The chunk a per-chunk prompt asks to have translated, or the whole
    /// source text for whole-text reflection and improvement prompts.
    pub(crate) fn target_chunk(prompt: &str) -> &str {
        between(prompt, "<TRANSLATE_THIS>\n", "\n</TRANSLATE_THIS>")
            .or_else(|| between(prompt, "<SOURCE_TEXT>\n", "\n</SOURCE_TEXT>"))
            .unwrap_or("")
    }

    /// Answers `T[chunk]`, `R[<translation it was shown>]` and `F[chunk]`
    /// for the three passes.
    pub(crate) fn scripted_mock() -> MockCompletion {
        MockCompletion::new(|request| {
            let prompt = &request.prompt;
            if prompt.contains("<EXPERT_SUGGESTIONS>") {
                Ok(format!("F[{}]", target_chunk(prompt)))
            } else if prompt.contains("<TRANSLATION>") {
                let shown = between(prompt, "<TRANSLATION>\n", "\n</TRANSLATION>").unwrap_or("");
                Ok(format!("R[{}]", shown))
            } else {
                Ok(format!("T[{}]", target_chunk(prompt)))
            }
        })
    }
}
