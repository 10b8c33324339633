//! API surface shared across feature routes

pub mod response;

pub use response::{ApiResponse, ErrorResponse};
