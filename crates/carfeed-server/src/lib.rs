//! Carfeed Server Library
//!
//! HTTP service for ingesting provider vehicle-listing CSV feeds.
//!
//! # Overview
//!
//! Each data provider delivers listings as a CSV file whose column layout is
//! declared in a per-provider layout file. The server accepts one uploaded
//! file per request, validates it against the provider's layout, transforms
//! every row into a canonical vehicle record, and persists the records in
//! fixed-size batches while a tracked ingestion job records the outcome.
//!
//! The upload request only blocks long enough to create the job row; parsing
//! and persistence run as a detached background task that finishes the job
//! with a terminal status. Clients observe progress through the job status
//! endpoint.
//!
//! # Architecture
//!
//! - **layouts**: provider name → expected column layout, loaded once at
//!   startup and shared read-only
//! - **ingest**: the ingestion engine (transform, batch persister, process
//!   tracker, workflow) plus the persistence boundary trait
//! - **features**: HTTP vertical slices (upload command, job status query)
//! - **api**: standard response envelopes
//!
//! # Framework Stack
//!
//! - **Axum**: HTTP routing, multipart uploads
//! - **SQLx**: PostgreSQL pool, migrations, runtime-checked queries
//! - **Tower / tower-http**: tracing, CORS, and compression layers

pub mod api;
pub mod config;
pub mod features;
pub mod ingest;
pub mod layouts;
pub mod middleware;

// Re-export commonly used types
pub use config::Config;
pub use layouts::{LayoutRegistry, ProviderLayout};
