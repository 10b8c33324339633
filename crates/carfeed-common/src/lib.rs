//! Carfeed Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared logging bootstrap for the carfeed workspace.
//!
//! # Example
//!
//! ```no_run
//! use carfeed_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

pub mod logging;

// Re-export commonly used types
pub use logging::{init_logging, LogConfig};
