//! Bifrost Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Offline pipelines that rebuild the Bifrost lookup databases from their
//! upstream public sources.
//!
//! # Supported Data Sources
//!
//! - **atlas**: GeoNames postal codes (`allCountries.zip`) into `atlas.db`
//! - **finly**: Razorpay IFSC releases (`IFSC.csv`, `banks.json`) into `finly.db`
//!
//! Each run rebuilds its tables inside a single SQLite transaction, so a
//! failed or canceled run leaves the previous data in place.
//!
//! # Example
//!
//! ```no_run
//! use bifrost_ingest::finly::{FinlyConfig, FinlyPipeline};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pipeline = FinlyPipeline::new(FinlyConfig::default());
//!     let outcome = pipeline.run(&CancellationToken::new()).await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

pub mod atlas;
pub mod cli;
pub mod common;
pub mod error;
pub mod finly;

pub use error::{IngestError, Result, Stage};
