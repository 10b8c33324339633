//! Feature modules implementing the carfeed API
//!
//! Each feature is a vertical slice with its own commands, queries, and
//! routes:
//!
//! - **ingest**: CSV feed upload (command) and job status lookup (query)
//!
//! Handlers are invoked directly from the routes; commands carry their own
//! `validate()` and per-operation error enums.

pub mod ingest;

use axum::Router;
use std::sync::Arc;

use crate::ingest::{IngestStore, IngestionWorkflow};
use crate::layouts::LayoutRegistry;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// Persistence boundary for jobs and records
    pub store: Arc<dyn IngestStore>,
    /// Provider layouts, loaded once at startup
    pub layouts: Arc<LayoutRegistry>,
    /// Ingestion orchestrator
    pub workflow: Arc<IngestionWorkflow>,
}

/// Creates the API router with all feature routes mounted
///
/// - `POST /ingest/:provider` - upload one CSV feed file
/// - `GET /jobs/:job_id` - ingestion job status
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/ingest", ingest::ingest_routes().with_state(state.clone()))
        .nest("/jobs", ingest::jobs_routes().with_state(state))
}
