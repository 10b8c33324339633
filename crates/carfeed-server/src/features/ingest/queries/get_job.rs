//! Get job query
//!
//! Read-only lookup of a single ingestion job. This is the only way the
//! outcome of background parsing and persistence is observable.

use serde::{Deserialize, Serialize};

use crate::ingest::{IngestStore, IngestionJob, StoreError};

/// Query to get a job by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetJobQuery {
    pub job_id: i64,
}

/// Error type for the get job query
#[derive(Debug, thiserror::Error)]
pub enum GetJobError {
    #[error("Job not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub async fn handle(store: &dyn IngestStore, query: GetJobQuery) -> Result<IngestionJob, GetJobError> {
    store
        .get_job(query.job_id)
        .await?
        .ok_or(GetJobError::NotFound)
}
