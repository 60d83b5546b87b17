//! Error types for the translation pipeline.

use std::fmt;

use thiserror::Error;

use crate::completion::CompletionError;

/// The pass of the translate → reflect → improve pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    InitialTranslation,
    Reflection,
    Improvement,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::InitialTranslation => write!(f, "initial translation"),
            Stage::Reflection => write!(f, "reflection"),
            Stage::Improvement => write!(f, "improvement"),
        }
    }
}

/// The unit of text a failed pass was working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassScope {
    /// The whole source text (single-chunk path).
    WholeText,
    /// One chunk of the source text, by index.
    Chunk(usize),
}

impl fmt::Display for PassScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassScope::WholeText => write!(f, "whole text"),
            PassScope::Chunk(index) => write!(f, "chunk {}", index),
        }
    }
}

/// Errors that abort a `translate` call.
///
/// None of these are retried by the pipeline; the caller owns retry policy.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// Rejected before any completion call was made.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The completion capability failed; partial results are discarded.
    #[error("{stage} pass failed for {scope}: {source}")]
    Completion {
        stage: Stage,
        scope: PassScope,
        #[source]
        source: CompletionError,
    },

    /// Tokenizer, splitter or provider misconfiguration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl TranslationError {
    pub(crate) fn completion(stage: Stage, scope: PassScope, source: CompletionError) -> Self {
        Self::Completion {
            stage,
            scope,
            source,
        }
    }

    /// Whether this error was caused by the caller's input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, TranslationError>;
