//! Bifrost Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared record types and logging setup for the Bifrost workspace.
//!
//! # Overview
//!
//! - **Types**: the geo location and bank records held by the lookup databases
//! - **Logging**: `tracing` subscriber configuration shared by every binary
//!
//! # Example
//!
//! ```no_run
//! use bifrost_common::logging::{init_logging, LogConfig, LogLevel};
//! use tracing::info;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::builder().level(LogLevel::Debug).build();
//!     init_logging(&config)?;
//!
//!     info!("Application started");
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod types;

// Re-export commonly used types
pub use types::{Bank, GeoLocation};
