//! Ingest feature module
//!
//! Upload endpoint that accepts a provider's CSV feed and starts the
//! ingestion workflow, plus the read-only job status endpoint.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::{ingest_routes, jobs_routes};
