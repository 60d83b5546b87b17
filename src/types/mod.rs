//! Core types for the translation service.

mod config;
mod job;
mod request;

pub use config::{EndpointConfig, PipelineConfig, ServiceConfig};
pub use job::{StartTranslationJobResponse, TranslationJobStatus, TranslationJobStatusResponse};
pub use request::{
    normalize_source_text, ChunkArtifacts, TranslationMode, TranslationOutcome,
    TranslationRequest,
};
