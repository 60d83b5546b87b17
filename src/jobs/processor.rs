//! Background execution of translation jobs.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info};
use uuid::Uuid;

use super::store::JobStore;
use crate::pipeline::Translator;
use crate::types::TranslationRequest;

/// Runs translation requests on the tokio runtime and records the result.
pub struct JobProcessor {
    translator: Arc<Translator>,
    job_store: Arc<RwLock<JobStore>>,
}

impl JobProcessor {
    pub fn new(translator: Arc<Translator>, job_store: Arc<RwLock<JobStore>>) -> Self {
        Self {
            translator,
            job_store,
        }
    }

    /// Create a job for `request`, start it in the background and return
    /// its ID. The task can be aborted through [`JobStore::cancel_job`].
    pub async fn submit(&self, request: TranslationRequest) -> Uuid {
        let job_id = self.job_store.write().await.create_job();

        let translator = self.translator.clone();
        let job_store = self.job_store.clone();
        let task = tokio::spawn(async move {
            Self::process_job(translator, job_id, request, job_store).await;
        });

        self.job_store
            .write()
            .await
            .attach_handle(job_id, task.abort_handle());
        job_id
    }

    /// Run one job to completion, recording the outcome in the store.
    pub async fn process_job(
        translator: Arc<Translator>,
        job_id: Uuid,
        request: TranslationRequest,
        job_store: Arc<RwLock<JobStore>>,
    ) {
        info!(
            job_id = %job_id,
            source_lang = %request.source_lang,
            target_lang = %request.target_lang,
            "Starting translation job"
        );

        if !job_store.write().await.start_job(job_id) {
            info!(job_id = %job_id, "Job no longer active, skipping");
            return;
        }

        match translator.translate(&request).await {
            Ok(outcome) => {
                info!(
                    job_id = %job_id,
                    mode = %outcome.mode,
                    chunks = outcome.chunk_count(),
                    "Translation job complete"
                );
                job_store.write().await.complete_job(job_id, outcome);
            }
            Err(e) => {
                error!(job_id = %job_id, error = %e, "Translation job failed");
                job_store.write().await.fail_job(job_id, e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::completion::{Agent, Agents, MockCompletion, ModelSettings};
    use crate::pipeline::testing::scripted_mock;
    use crate::types::{PipelineConfig, TranslationJobStatus};

    fn processor(mock: &Arc<MockCompletion>) -> (JobProcessor, Arc<RwLock<JobStore>>) {
        let agent = Agent::new(mock.clone(), ModelSettings::default());
        let translator = Translator::with_counter(
            Agents::single(agent),
            &PipelineConfig::default(),
            Arc::new(crate::chunkers::CharCounter),
        );
        let store = Arc::new(RwLock::new(JobStore::new()));
        (JobProcessor::new(Arc::new(translator), store.clone()), store)
    }

    async fn wait_until_terminal(store: &Arc<RwLock<JobStore>>, job_id: Uuid) -> TranslationJobStatus {
        loop {
            let status = store.read().await.get_job(job_id).map(|j| j.status);
            match status {
                Some(status) if status.is_terminal() => return status,
                _ => tokio::task::yield_now().await,
            }
        }
    }

    #[tokio::test]
    async fn test_submitted_job_completes() {
        let mock = Arc::new(scripted_mock());
        let (processor, store) = processor(&mock);

        let job_id = processor
            .submit(TranslationRequest::new("English", "Spanish", "Good night"))
            .await;

        assert_eq!(
            wait_until_terminal(&store, job_id).await,
            TranslationJobStatus::Completed
        );
        let status = store.read().await.get_job_status(job_id).unwrap();
        assert_eq!(
            status.outcome.unwrap().final_translation(),
            "F[Good night]"
        );
    }

    #[tokio::test]
    async fn test_failed_translation_marks_job_failed() {
        let mock = Arc::new(MockCompletion::failing("invalid api key"));
        let (processor, store) = processor(&mock);

        let job_id = processor
            .submit(TranslationRequest::new("English", "Spanish", "Hello"))
            .await;

        assert_eq!(
            wait_until_terminal(&store, job_id).await,
            TranslationJobStatus::Failed
        );
        let error = store.read().await.get_job(job_id).unwrap().error.clone();
        assert!(error.unwrap().contains("invalid api key"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_running_job() {
        let mock = Arc::new(scripted_mock().with_delay(|_| Duration::from_secs(60)));
        let (processor, store) = processor(&mock);

        let job_id = processor
            .submit(TranslationRequest::new("English", "Spanish", "Hello"))
            .await;
        while mock.call_count() == 0 {
            tokio::task::yield_now().await;
        }

        assert_eq!(
            store.write().await.cancel_job(job_id),
            Some(TranslationJobStatus::Cancelled)
        );

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(mock.call_count(), 1);
        let status = store.read().await.get_job_status(job_id).unwrap();
        assert_eq!(status.status, TranslationJobStatus::Cancelled);
        assert!(status.outcome.is_none());
    }
}
