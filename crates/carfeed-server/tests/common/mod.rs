//! Shared helpers for integration tests
//!
//! Provides an in-memory implementation of the persistence boundary, a
//! router wired exactly like the production one, and a multipart body
//! builder for upload requests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use carfeed_server::features::{self, FeatureState};
use carfeed_server::ingest::{
    CanonicalRecord, IngestStore, IngestionJob, IngestionWorkflow, JobStatus, StoreError,
};
use carfeed_server::layouts::{LayoutRegistry, ProviderLayout};

/// In-memory store standing in for PostgreSQL.
#[derive(Default)]
pub struct MemoryStore {
    pub jobs: Mutex<Vec<IngestionJob>>,
    pub records: Mutex<Vec<CanonicalRecord>>,
    pub batch_sizes: Mutex<Vec<usize>>,
    pub fail_job_creation: bool,
    pub fail_inserts: bool,
}

#[async_trait]
impl IngestStore for MemoryStore {
    async fn create_job(&self, provider: &str, file_name: &str) -> Result<i64, StoreError> {
        if self.fail_job_creation {
            return Err(StoreError::Database("store unavailable".to_string()));
        }
        let mut jobs = self.jobs.lock().unwrap();
        let id = jobs.len() as i64 + 1;
        let now = Utc::now();
        jobs.push(IngestionJob {
            id,
            provider: provider.to_string(),
            file_name: file_name.to_string(),
            status: JobStatus::Started.as_str().to_string(),
            finished: false,
            started_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn update_job(
        &self,
        job_id: i64,
        status: JobStatus,
        finished: bool,
    ) -> Result<(), StoreError> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .iter_mut()
            .find(|job| job.id == job_id)
            .ok_or_else(|| StoreError::Rejected(format!("no job {job_id}")))?;
        job.status = status.as_str().to_string();
        job.finished = finished;
        job.updated_at = Utc::now();
        Ok(())
    }

    async fn insert_records(&self, batch: &[CanonicalRecord]) -> Result<(), StoreError> {
        if self.fail_inserts {
            return Err(StoreError::Rejected("insert disabled".to_string()));
        }
        self.batch_sizes.lock().unwrap().push(batch.len());
        self.records.lock().unwrap().extend_from_slice(batch);
        Ok(())
    }

    async fn get_job(&self, job_id: i64) -> Result<Option<IngestionJob>, StoreError> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .find(|job| job.id == job_id)
            .cloned())
    }
}

/// Registry with the "acme" provider: header row, required columns uuid/vin.
pub fn acme_registry() -> LayoutRegistry {
    LayoutRegistry::from_layouts(vec![ProviderLayout {
        provider_name: "acme".to_string(),
        has_header: true,
        columns: vec!["uuid".to_string(), "vin".to_string()],
    }])
    .unwrap()
}

/// Build the API router exactly as the server does, on top of the given
/// store, with a small batch size so batching is observable in tests.
pub fn test_app(store: Arc<MemoryStore>, batch_size: usize) -> Router {
    let store: Arc<dyn IngestStore> = store;
    let workflow = Arc::new(IngestionWorkflow::new(Arc::clone(&store), batch_size));
    let state = FeatureState {
        store,
        layouts: Arc::new(acme_registry()),
        workflow,
    };
    Router::new().nest("/api/v1", features::router(state))
}

pub const BOUNDARY: &str = "carfeed-test-boundary";

/// Multipart content type header value for [`multipart_body`] payloads.
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// Build a multipart body with one part per `(filename, content)` pair.
pub fn multipart_body(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (filename, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Poll the store until the job reaches a finished state.
pub async fn wait_for_finish(store: &MemoryStore, job_id: i64) -> IngestionJob {
    for _ in 0..100 {
        if let Some(job) = store.get_job(job_id).await.unwrap() {
            if job.finished {
                return job;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {job_id} never finished");
}
