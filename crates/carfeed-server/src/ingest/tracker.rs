//! Ingestion job lifecycle tracking

use std::sync::Arc;

use super::models::JobStatus;
use super::store::{IngestStore, StoreError};

/// Creates job rows and records their single terminal transition.
///
/// The tracker is the only writer of job state. A job is created as
/// `Started` and finished at most once; callers guarantee that `finish` is
/// invoked exactly once per job, with a terminal status.
#[derive(Clone)]
pub struct ProcessTracker {
    store: Arc<dyn IngestStore>,
}

impl ProcessTracker {
    pub fn new(store: Arc<dyn IngestStore>) -> Self {
        Self { store }
    }

    /// Persist a new job with status `Started` and return its id.
    ///
    /// A failure here means no job exists; callers must not start any
    /// background work.
    pub async fn create(&self, provider: &str, file_name: &str) -> Result<i64, StoreError> {
        let job_id = self.store.create_job(provider, file_name).await?;
        tracing::info!(job_id, provider, file_name, "Ingestion job created");
        Ok(job_id)
    }

    /// Record the job's terminal status and mark it finished.
    pub async fn finish(&self, job_id: i64, status: JobStatus) -> Result<(), StoreError> {
        debug_assert!(status.is_terminal());
        self.store.update_job(job_id, status, true).await?;
        tracing::info!(job_id, status = %status, "Ingestion job finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::models::{CanonicalRecord, IngestionJob};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Store that records the sequence of job writes.
    #[derive(Default)]
    struct JournalStore {
        journal: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl IngestStore for JournalStore {
        async fn create_job(&self, provider: &str, file_name: &str) -> Result<i64, StoreError> {
            self.journal
                .lock()
                .unwrap()
                .push(format!("create {provider} {file_name}"));
            Ok(42)
        }

        async fn update_job(
            &self,
            job_id: i64,
            status: JobStatus,
            finished: bool,
        ) -> Result<(), StoreError> {
            self.journal
                .lock()
                .unwrap()
                .push(format!("update {job_id} {status} finished={finished}"));
            Ok(())
        }

        async fn insert_records(&self, _batch: &[CanonicalRecord]) -> Result<(), StoreError> {
            Ok(())
        }

        async fn get_job(&self, _job_id: i64) -> Result<Option<IngestionJob>, StoreError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_create_then_finish_writes_once_each() {
        let store = Arc::new(JournalStore::default());
        let tracker = ProcessTracker::new(store.clone());

        let job_id = tracker.create("acme", "feed.csv").await.unwrap();
        tracker.finish(job_id, JobStatus::Succeeded).await.unwrap();

        let journal = store.journal.lock().unwrap();
        assert_eq!(
            *journal,
            vec![
                "create acme feed.csv".to_string(),
                "update 42 succeeded finished=true".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_failure_returns_error() {
        struct FailingStore;

        #[async_trait]
        impl IngestStore for FailingStore {
            async fn create_job(&self, _: &str, _: &str) -> Result<i64, StoreError> {
                Err(StoreError::Database("connection refused".to_string()))
            }

            async fn update_job(&self, _: i64, _: JobStatus, _: bool) -> Result<(), StoreError> {
                Ok(())
            }

            async fn insert_records(&self, _: &[CanonicalRecord]) -> Result<(), StoreError> {
                Ok(())
            }

            async fn get_job(&self, _: i64) -> Result<Option<IngestionJob>, StoreError> {
                Ok(None)
            }
        }

        let tracker = ProcessTracker::new(Arc::new(FailingStore));
        assert!(tracker.create("acme", "feed.csv").await.is_err());
    }
}
