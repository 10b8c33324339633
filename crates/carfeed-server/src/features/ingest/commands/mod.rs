//! Ingest commands

pub mod start;

pub use start::{StartIngestionCommand, StartIngestionError, StartIngestionResponse};
