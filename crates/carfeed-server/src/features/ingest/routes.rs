//! Ingest routes
//!
//! `POST /ingest/:provider` accepts exactly one multipart file field and
//! replies as soon as the job row exists; `GET /jobs/:job_id` exposes the
//! job's status. Rejections here happen before a job is created — anything
//! that fails later is recorded on the job instead.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use super::commands::{self, StartIngestionCommand, StartIngestionError};
use super::queries::{self, GetJobError, GetJobQuery};
use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::FeatureState;

/// Fallback name when the multipart field carries no filename.
const DEFAULT_FILE_NAME: &str = "upload.csv";

pub fn ingest_routes() -> Router<FeatureState> {
    Router::new().route("/:provider", post(start_ingestion))
}

pub fn jobs_routes() -> Router<FeatureState> {
    Router::new().route("/:job_id", get(get_job))
}

#[tracing::instrument(skip(state, multipart), fields(provider = %provider))]
async fn start_ingestion(
    State(state): State<FeatureState>,
    Path(provider): Path<String>,
    mut multipart: Multipart,
) -> Result<Response, IngestApiError> {
    let layout = state
        .layouts
        .lookup(&provider)
        .cloned()
        .ok_or_else(|| IngestApiError::UnknownProvider(provider.clone()))?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| IngestApiError::Multipart(e.to_string()))?
    {
        if upload.is_some() {
            return Err(IngestApiError::MultipleFiles);
        }
        let file_name = field.file_name().unwrap_or(DEFAULT_FILE_NAME).to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| IngestApiError::Multipart(e.to_string()))?;
        upload = Some((file_name, data.to_vec()));
    }

    let (file_name, content) = upload.ok_or(IngestApiError::NoFile)?;

    let command = StartIngestionCommand {
        provider,
        file_name,
        content,
    };
    let response = commands::start::handle(&state.workflow, layout, command).await?;

    tracing::info!(job_id = response.job_id, "Ingestion job accepted via API");

    Ok((StatusCode::ACCEPTED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state))]
async fn get_job(
    State(state): State<FeatureState>,
    Path(job_id): Path<i64>,
) -> Result<Response, IngestApiError> {
    let query = GetJobQuery { job_id };
    let job = queries::get_job::handle(state.store.as_ref(), query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(job))).into_response())
}

#[derive(Debug)]
enum IngestApiError {
    UnknownProvider(String),
    NoFile,
    MultipleFiles,
    Multipart(String),
    Start(StartIngestionError),
    Job(GetJobError),
}

impl From<StartIngestionError> for IngestApiError {
    fn from(err: StartIngestionError) -> Self {
        Self::Start(err)
    }
}

impl From<GetJobError> for IngestApiError {
    fn from(err: GetJobError) -> Self {
        Self::Job(err)
    }
}

impl IntoResponse for IngestApiError {
    fn into_response(self) -> Response {
        match self {
            IngestApiError::UnknownProvider(ref provider) => {
                let error = ErrorResponse::new(
                    "PROVIDER_NOT_CONFIGURED",
                    format!("No provider layout configured for '{provider}'"),
                );
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            IngestApiError::NoFile => {
                let error = ErrorResponse::new("UPLOAD_ERROR", "Must upload a CSV file");
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            IngestApiError::MultipleFiles => {
                let error = ErrorResponse::new("UPLOAD_ERROR", "Must upload a single file");
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            IngestApiError::Multipart(_) => {
                let error = ErrorResponse::new("UPLOAD_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            IngestApiError::Start(StartIngestionError::JobCreation(_)) => {
                tracing::error!("Failed to create ingestion job: {}", self);
                let error =
                    ErrorResponse::new("PERSISTENCE_ERROR", "Failed to start ingestion job");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
            IngestApiError::Start(_) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            IngestApiError::Job(GetJobError::NotFound) => {
                let error = ErrorResponse::new("NOT_FOUND", "Job not found");
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            IngestApiError::Job(GetJobError::Store(_)) => {
                tracing::error!("Storage error during job lookup: {}", self);
                let error = ErrorResponse::new("PERSISTENCE_ERROR", "A storage error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}

impl std::fmt::Display for IngestApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownProvider(provider) => {
                write!(f, "no provider layout configured for '{provider}'")
            },
            Self::NoFile => write!(f, "must upload a CSV file"),
            Self::MultipleFiles => write!(f, "must upload a single file"),
            Self::Multipart(message) => write!(f, "invalid multipart upload: {message}"),
            Self::Start(e) => write!(f, "{e}"),
            Self::Job(e) => write!(f, "{e}"),
        }
    }
}
