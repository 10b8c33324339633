//! Feed ingestion engine
//!
//! # Architecture
//!
//! - **models**: canonical vehicle record, job status vocabulary, job row
//! - **store**: the persistence boundary (`IngestStore`) and its PostgreSQL
//!   implementation — `create_job`, `update_job`, `insert_records`, each an
//!   independent, atomic operation
//! - **transform**: CSV bytes → canonical records, validated against the
//!   provider layout
//! - **tracker**: job lifecycle bookkeeping (create, single terminal update)
//! - **persister**: fixed-size batched writes with concurrent dispatch
//! - **workflow**: the orchestration state machine; the only synchronous
//!   step visible to callers is job creation
//!
//! The public HTTP surface for this engine lives in `features::ingest`.

pub mod models;
pub mod persister;
pub mod store;
pub mod tracker;
pub mod transform;
pub mod workflow;

pub use models::{CanonicalRecord, IngestionJob, JobStatus};
pub use persister::{BatchPersister, PersistError};
pub use store::{IngestStore, PgIngestStore, StoreError};
pub use tracker::ProcessTracker;
pub use transform::TransformError;
pub use workflow::IngestionWorkflow;
