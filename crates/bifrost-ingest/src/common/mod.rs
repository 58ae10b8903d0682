//! Dataset-independent pipeline stages
//!
//! - **fetch**: streaming HTTP downloads with cancellation
//! - **archive**: ZIP member lookup
//! - **records**: lazy delimited-text decoding
//! - **materialize**: transactional table rebuilds in SQLite

pub mod archive;
pub mod fetch;
pub mod materialize;
pub mod records;

pub use archive::Archive;
pub use fetch::{FetchConfig, FetchedArtifact, Fetcher};
pub use materialize::{Dataset, Materializer};
pub use records::{records, DecodeOptions, RawRecord, Records};
