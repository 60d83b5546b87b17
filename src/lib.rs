//! Translation Agent Library
//!
//! Agentic machine translation with an LLM: translate, reflect on the
//! translation, then improve it. Texts longer than the per-chunk token
//! budget are split into near-equal chunks, each translated with the whole
//! text as context.

pub mod api;
pub mod chunkers;
pub mod completion;
pub mod error;
pub mod jobs;
pub mod pipeline;
pub mod types;

pub use chunkers::{calculate_chunk_size, RecursiveSplitter, TiktokenCounter, TokenCounter};
pub use completion::{Agent, Agents, CompletionProvider, CompletionRequest, ModelSettings};
pub use error::{Result, TranslationError};
pub use pipeline::Translator;
pub use types::{ChunkArtifacts, TranslationMode, TranslationOutcome, TranslationRequest};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::chunkers::{TiktokenCounter, TokenCounter};
    pub use crate::completion::{
        build_agents, Agent, Agents, CompletionError, CompletionProvider, CompletionRequest,
        Endpoint, MockCompletion, ModelSettings,
    };
    pub use crate::error::{PassScope, Stage, TranslationError};
    pub use crate::pipeline::Translator;
    pub use crate::types::*;
}

/// Default per-chunk token budget
pub const DEFAULT_MAX_TOKENS_PER_CHUNK: usize = 1000;

/// Default tiktoken encoding
pub const DEFAULT_ENCODING: &str = "cl100k_base";

/// Default completion model
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Default process-wide completion call rate
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 60;

/// Default concurrent completion calls within one pass
pub const DEFAULT_CONCURRENCY: usize = 4;
