//! Ingestion workflow orchestration
//!
//! State machine: `Accepted → Parsing → Persisting → Terminal`. The only
//! synchronous step is job creation; the caller gets the job id back while
//! parsing and persistence run in a detached task. Every background path —
//! validation failure, persistence failure — ends in a terminal status
//! update, never in an error surfaced to the caller.

use std::sync::Arc;
use thiserror::Error;

use super::models::JobStatus;
use super::persister::{BatchPersister, PersistError};
use super::store::{IngestStore, StoreError};
use super::tracker::ProcessTracker;
use super::transform::{self, TransformError};
use crate::layouts::ProviderLayout;

/// Failures inside the detached parse/persist phase. These are absorbed
/// into the job's terminal status and only observable through it.
#[derive(Debug, Error)]
enum PipelineError {
    #[error(transparent)]
    Validation(#[from] TransformError),

    #[error(transparent)]
    Persistence(#[from] PersistError),
}

/// Drives one uploaded file from acceptance to a terminal job status.
#[derive(Clone)]
pub struct IngestionWorkflow {
    tracker: ProcessTracker,
    persister: BatchPersister,
}

impl IngestionWorkflow {
    pub fn new(store: Arc<dyn IngestStore>, batch_size: usize) -> Self {
        Self {
            tracker: ProcessTracker::new(Arc::clone(&store)),
            persister: BatchPersister::new(store, batch_size),
        }
    }

    /// Accept an upload: create the job synchronously, then hand the actual
    /// work to a detached task and return the job id immediately.
    ///
    /// An error here means job creation failed and nothing was dispatched.
    /// Once this returns `Ok`, the caller cannot observe the outcome except
    /// through the job's status.
    pub async fn start(
        &self,
        layout: ProviderLayout,
        file_name: String,
        payload: Vec<u8>,
    ) -> Result<i64, StoreError> {
        let job_id = self
            .tracker
            .create(&layout.provider_name, &file_name)
            .await?;

        let tracker = self.tracker.clone();
        let persister = self.persister.clone();
        tokio::spawn(async move {
            let status = match run_pipeline(&persister, &layout, &payload).await {
                Ok(record_count) => {
                    tracing::info!(job_id, record_count, "Ingestion pipeline succeeded");
                    JobStatus::Succeeded
                },
                Err(error) => {
                    tracing::warn!(job_id, %error, "Ingestion pipeline failed");
                    JobStatus::Failed
                },
            };

            if let Err(error) = tracker.finish(job_id, status).await {
                tracing::error!(job_id, %error, "Failed to record terminal job status");
            }
        });

        Ok(job_id)
    }
}

/// Parsing and persisting phases; all batches have completed by the time
/// this returns.
async fn run_pipeline(
    persister: &BatchPersister,
    layout: &ProviderLayout,
    payload: &[u8],
) -> Result<usize, PipelineError> {
    let records = transform::parse(payload, layout)?;
    persister.write_all(&records).await?;
    Ok(records.len())
}
