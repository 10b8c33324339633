//! Batched record persistence
//!
//! Splits a record sequence into fixed-size batches and writes each batch
//! with a single atomic store call. Batches are independent: they are
//! dispatched concurrently, a failed batch does not roll back batches that
//! already committed, and the overall result is a failure if any batch
//! failed (first error wins). All batches complete, successfully or not,
//! before this returns.

use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;

use super::models::CanonicalRecord;
use super::store::{IngestStore, StoreError};

/// Errors from a batched write
#[derive(Debug, Error)]
pub enum PersistError {
    /// Caller contract violation: records must be non-empty.
    #[error("Refusing to persist an empty record set")]
    EmptyBatch,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fixed-size batch writer over the persistence boundary
#[derive(Clone)]
pub struct BatchPersister {
    store: Arc<dyn IngestStore>,
    batch_size: usize,
}

impl BatchPersister {
    /// `batch_size` must be non-zero; configuration validates this before
    /// the persister is built.
    pub fn new(store: Arc<dyn IngestStore>, batch_size: usize) -> Self {
        debug_assert!(batch_size > 0);
        Self { store, batch_size }
    }

    /// Write all records in order-preserving batches of `batch_size`.
    pub async fn write_all(&self, records: &[CanonicalRecord]) -> Result<(), PersistError> {
        if records.is_empty() {
            return Err(PersistError::EmptyBatch);
        }

        let batches: Vec<&[CanonicalRecord]> = records.chunks(self.batch_size).collect();
        let batch_count = batches.len();

        let results = join_all(batches.into_iter().enumerate().map(|(index, batch)| {
            let store = Arc::clone(&self.store);
            async move {
                store.insert_records(batch).await.inspect_err(|error| {
                    tracing::error!(batch = index, rows = batch.len(), %error, "Batch insert failed");
                })
            }
        }))
        .await;

        let failed = results.iter().filter(|result| result.is_err()).count();
        if failed > 0 {
            tracing::warn!(
                batches = batch_count,
                failed,
                "Batched write completed with failures"
            );
        } else {
            tracing::debug!(
                records = records.len(),
                batches = batch_count,
                "Batched write completed"
            );
        }

        // join_all preserves submission order, so the first Err here is the
        // first failed batch.
        results.into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(())
    }
}
