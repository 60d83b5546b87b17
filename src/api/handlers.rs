//! HTTP request handlers for the translation service.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::TranslationError;
use crate::jobs::{JobProcessor, JobStore};
use crate::pipeline::Translator;
use crate::types::{
    normalize_source_text, ServiceConfig, StartTranslationJobResponse,
    TranslationJobStatusResponse, TranslationMode, TranslationOutcome, TranslationRequest,
};

/// Application state shared across handlers.
pub struct AppState {
    pub translator: Arc<Translator>,
    pub job_store: Arc<RwLock<JobStore>>,
    pub processor: JobProcessor,
    pub config: ServiceConfig,
}

impl AppState {
    pub fn new(translator: Arc<Translator>, config: ServiceConfig) -> Self {
        let job_store = Arc::new(RwLock::new(JobStore::new()));
        Self {
            processor: JobProcessor::new(translator.clone(), job_store.clone()),
            translator,
            job_store,
            config,
        }
    }
}

/// Body of a translate call. The chunk budget falls back to the service
/// default when omitted.
#[derive(Debug, Deserialize)]
pub struct TranslateBody {
    pub source_lang: String,
    pub target_lang: String,
    pub source_text: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub max_tokens_per_chunk: Option<usize>,
}

impl TranslateBody {
    fn into_request(self, config: &ServiceConfig) -> TranslationRequest {
        TranslationRequest::new(
            &self.source_lang,
            &self.target_lang,
            &normalize_source_text(&self.source_text),
        )
        .with_country(&self.country)
        .with_max_tokens(
            self.max_tokens_per_chunk
                .unwrap_or(config.max_tokens_per_chunk),
        )
    }
}

/// Synchronous translation response.
#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub mode: TranslationMode,
    pub token_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
    pub chunk_count: usize,
    pub initial_translation: String,
    pub reflection: String,
    pub final_translation: String,
}

impl From<TranslationOutcome> for TranslateResponse {
    fn from(outcome: TranslationOutcome) -> Self {
        Self {
            mode: outcome.mode,
            token_count: outcome.token_count,
            chunk_size: outcome.chunk_size,
            chunk_count: outcome.chunk_count(),
            initial_translation: outcome.initial_translation(),
            reflection: outcome.reflection(),
            final_translation: outcome.final_translation(),
        }
    }
}

/// Error body returned for failed requests.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Handler error mapped to an HTTP status.
#[derive(Debug)]
pub enum ApiError {
    Translation(TranslationError),
    JobNotFound(Uuid),
}

impl From<TranslationError> for ApiError {
    fn from(err: TranslationError) -> Self {
        ApiError::Translation(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Translation(TranslationError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Translation(TranslationError::Completion { .. }) => StatusCode::BAD_GATEWAY,
            ApiError::Translation(TranslationError::Config(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::JobNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match &self {
            ApiError::Translation(e) => e.to_string(),
            ApiError::JobNotFound(id) => format!("job {} not found", id),
        };
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %error, "Request failed");
        }
        (status, Json(ErrorBody { error })).into_response()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Translate a text and wait for the result.
pub async fn translate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TranslateBody>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let request = body.into_request(&state.config);
    info!(
        source_lang = %request.source_lang,
        target_lang = %request.target_lang,
        len = request.source_text.len(),
        "Received translate request"
    );

    let outcome = state.translator.translate(&request).await?;
    Ok(Json(outcome.into()))
}

/// Start a background translation job.
pub async fn start_translation_job(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TranslateBody>,
) -> Result<Json<StartTranslationJobResponse>, ApiError> {
    let request = body.into_request(&state.config);
    // Reject up front so callers don't poll a job that can only fail.
    request.validate()?;

    let job_id = state.processor.submit(request).await;
    info!(job_id = %job_id, "Accepted translation job");

    Ok(Json(StartTranslationJobResponse {
        job_id,
        accepted: true,
        message: None,
    }))
}

/// Get job status.
pub async fn get_job_status(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<TranslationJobStatusResponse>, ApiError> {
    let store = state.job_store.read().await;
    store
        .get_job_status(job_id)
        .map(Json)
        .ok_or(ApiError::JobNotFound(job_id))
}

/// Cancel a pending or running job.
pub async fn cancel_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<TranslationJobStatusResponse>, ApiError> {
    let mut store = state.job_store.write().await;
    let status = store
        .cancel_job(job_id)
        .ok_or(ApiError::JobNotFound(job_id))?;
    info!(job_id = %job_id, status = ?status, "Cancel requested");

    store
        .get_job_status(job_id)
        .map(Json)
        .ok_or(ApiError::JobNotFound(job_id))
}
