//! Job store for tracking background translation jobs.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::task::AbortHandle;
use uuid::Uuid;

use crate::types::{
    TranslationJobStatus, TranslationJobStatusResponse, TranslationMode, TranslationOutcome,
};

/// In-memory job store for tracking translation jobs.
///
/// Shared between the HTTP handlers and the job tasks as
/// `Arc<RwLock<JobStore>>`.
pub struct JobStore {
    jobs: HashMap<Uuid, JobRecord>,
    handles: HashMap<Uuid, AbortHandle>,
}

/// Internal record for tracking a job.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub job_id: Uuid,
    pub status: TranslationJobStatus,
    pub outcome: Option<TranslationOutcome>,
    pub error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl JobRecord {
    pub fn new(job_id: Uuid) -> Self {
        Self {
            job_id,
            status: TranslationJobStatus::Pending,
            outcome: None,
            error: None,
            started_at: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn start(&mut self) {
        self.status = TranslationJobStatus::Running;
        self.started_at = Some(Utc::now());
    }

    pub fn complete(&mut self, outcome: TranslationOutcome) {
        self.status = TranslationJobStatus::Completed;
        self.outcome = Some(outcome);
        self.completed_at = Some(Utc::now());
    }

    pub fn fail(&mut self, error: String) {
        self.status = TranslationJobStatus::Failed;
        self.error = Some(error);
        self.completed_at = Some(Utc::now());
    }

    pub fn cancel(&mut self) {
        self.status = TranslationJobStatus::Cancelled;
        self.completed_at = Some(Utc::now());
    }

    /// Path taken by the orchestrator, known once the job has completed.
    pub fn mode(&self) -> Option<TranslationMode> {
        self.outcome.as_ref().map(|o| o.mode)
    }

    pub fn to_response(&self) -> TranslationJobStatusResponse {
        TranslationJobStatusResponse {
            job_id: self.job_id,
            status: self.status,
            mode: self.mode(),
            outcome: self.outcome.clone(),
            error: self.error.clone(),
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }
}

impl JobStore {
    pub fn new() -> Self {
        Self {
            jobs: HashMap::new(),
            handles: HashMap::new(),
        }
    }

    /// Create a new pending job and return its ID.
    pub fn create_job(&mut self) -> Uuid {
        let job_id = Uuid::new_v4();
        self.jobs.insert(job_id, JobRecord::new(job_id));
        job_id
    }

    pub fn get_job(&self, job_id: Uuid) -> Option<&JobRecord> {
        self.jobs.get(&job_id)
    }

    /// Remember how to abort the task running a job.
    ///
    /// Ignored if the job already reached a terminal state.
    pub fn attach_handle(&mut self, job_id: Uuid, handle: AbortHandle) {
        if self.active(job_id).is_some() {
            self.handles.insert(job_id, handle);
        }
    }

    /// Mark a pending job as running.
    pub fn start_job(&mut self, job_id: Uuid) -> bool {
        match self.active(job_id) {
            Some(job) => {
                job.start();
                true
            }
            None => false,
        }
    }

    /// Record a successful outcome. No-op for cancelled or unknown jobs.
    pub fn complete_job(&mut self, job_id: Uuid, outcome: TranslationOutcome) -> bool {
        self.handles.remove(&job_id);
        match self.active(job_id) {
            Some(job) => {
                job.complete(outcome);
                true
            }
            None => false,
        }
    }

    /// Record a failure. No-op for cancelled or unknown jobs.
    pub fn fail_job(&mut self, job_id: Uuid, error: String) -> bool {
        self.handles.remove(&job_id);
        match self.active(job_id) {
            Some(job) => {
                job.fail(error);
                true
            }
            None => false,
        }
    }

    /// Cancel a pending or running job, aborting its task.
    ///
    /// Returns the job's status afterwards, or `None` for an unknown job.
    /// Jobs that already finished keep their status.
    pub fn cancel_job(&mut self, job_id: Uuid) -> Option<TranslationJobStatus> {
        let job = self.jobs.get_mut(&job_id)?;
        if !job.status.is_terminal() {
            if let Some(handle) = self.handles.remove(&job_id) {
                handle.abort();
            }
            job.cancel();
        }
        Some(job.status)
    }

    pub fn get_job_status(&self, job_id: Uuid) -> Option<TranslationJobStatusResponse> {
        self.jobs.get(&job_id).map(|j| j.to_response())
    }

    /// Drop finished jobs older than one hour.
    pub fn cleanup_old_jobs(&mut self) {
        let cutoff = Utc::now() - chrono::Duration::hours(1);
        self.jobs.retain(|_, job| {
            if job.status.is_terminal() {
                job.completed_at.map_or(true, |t| t > cutoff)
            } else {
                true
            }
        });
    }

    /// Count of jobs by status.
    pub fn get_job_counts(&self) -> HashMap<TranslationJobStatus, usize> {
        let mut counts = HashMap::new();
        for job in self.jobs.values() {
            *counts.entry(job.status).or_insert(0) += 1;
        }
        counts
    }

    fn active(&mut self, job_id: Uuid) -> Option<&mut JobRecord> {
        self.jobs
            .get_mut(&job_id)
            .filter(|job| !job.status.is_terminal())
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChunkArtifacts;

    fn outcome() -> TranslationOutcome {
        TranslationOutcome {
            mode: TranslationMode::SingleChunk,
            token_count: 2,
            chunk_size: None,
            chunks: vec![ChunkArtifacts {
                source: "Hi".to_string(),
                initial_translation: "Hola".to_string(),
                reflection: "Fine.".to_string(),
                final_translation: "Hola".to_string(),
            }],
        }
    }

    #[test]
    fn test_job_lifecycle() {
        let mut store = JobStore::new();
        let job_id = store.create_job();
        assert_eq!(
            store.get_job(job_id).unwrap().status,
            TranslationJobStatus::Pending
        );

        assert!(store.start_job(job_id));
        assert!(store.get_job(job_id).unwrap().started_at.is_some());

        assert!(store.complete_job(job_id, outcome()));
        let status = store.get_job_status(job_id).unwrap();
        assert_eq!(status.status, TranslationJobStatus::Completed);
        assert_eq!(status.mode, Some(TranslationMode::SingleChunk));
        assert_eq!(status.outcome.unwrap().final_translation(), "Hola");
        assert!(status.completed_at.is_some());
    }

    #[test]
    fn test_failed_job_keeps_error() {
        let mut store = JobStore::new();
        let job_id = store.create_job();
        store.start_job(job_id);
        assert!(store.fail_job(job_id, "upstream returned 503".to_string()));

        let status = store.get_job_status(job_id).unwrap();
        assert_eq!(status.status, TranslationJobStatus::Failed);
        assert_eq!(status.error.as_deref(), Some("upstream returned 503"));
        assert!(status.outcome.is_none());
    }

    #[test]
    fn test_cancelled_job_ignores_late_result() {
        let mut store = JobStore::new();
        let job_id = store.create_job();
        store.start_job(job_id);

        assert_eq!(
            store.cancel_job(job_id),
            Some(TranslationJobStatus::Cancelled)
        );
        assert!(!store.complete_job(job_id, outcome()));
        assert_eq!(
            store.get_job(job_id).unwrap().status,
            TranslationJobStatus::Cancelled
        );
    }

    #[test]
    fn test_cancel_finished_or_unknown_job() {
        let mut store = JobStore::new();
        let job_id = store.create_job();
        store.complete_job(job_id, outcome());

        assert_eq!(
            store.cancel_job(job_id),
            Some(TranslationJobStatus::Completed)
        );
        assert_eq!(store.cancel_job(Uuid::new_v4()), None);
    }

    #[test]
    fn test_job_counts() {
        let mut store = JobStore::new();
        let done = store.create_job();
        store.complete_job(done, outcome());
        store.create_job();
        store.create_job();

        let counts = store.get_job_counts();
        assert_eq!(counts.get(&TranslationJobStatus::Pending), Some(&2));
        assert_eq!(counts.get(&TranslationJobStatus::Completed), Some(&1));
    }

    #[test]
    fn test_cleanup_keeps_recent_and_active_jobs() {
        let mut store = JobStore::new();
        let done = store.create_job();
        store.complete_job(done, outcome());
        let pending = store.create_job();

        store.cleanup_old_jobs();
        assert!(store.get_job(done).is_some());
        assert!(store.get_job(pending).is_some());
    }
}
