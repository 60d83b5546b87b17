//! Background translation job types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{TranslationMode, TranslationOutcome};

/// Status of a translation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationJobStatus {
    /// Job is queued but not started
    Pending,
    /// Job is currently running
    Running,
    /// Job completed successfully
    Completed,
    /// Job failed
    Failed,
    /// Job was cancelled by the caller
    Cancelled,
}

impl TranslationJobStatus {
    /// Whether the job can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TranslationJobStatus::Completed
                | TranslationJobStatus::Failed
                | TranslationJobStatus::Cancelled
        )
    }
}

/// Response when starting a translation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartTranslationJobResponse {
    /// ID of the created job
    pub job_id: Uuid,

    /// Whether the job was accepted
    pub accepted: bool,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response with job status information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationJobStatusResponse {
    /// ID of the job
    pub job_id: Uuid,

    /// Current status
    pub status: TranslationJobStatus,

    /// Path taken by the orchestrator, once known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<TranslationMode>,

    /// The translation, when completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<TranslationOutcome>,

    /// Error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// When the job started
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// When the job completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}
