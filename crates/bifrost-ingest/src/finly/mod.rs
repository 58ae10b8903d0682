//! Razorpay IFSC ingestion
//!
//! Rebuilds the `bank` and `version` tables of `finly.db` from the assets of
//! the latest `razorpay/ifsc` GitHub release, joining each branch against the
//! `banks.json` catalog for its bank code.

pub mod catalog;
pub mod config;
pub mod parser;
pub mod pipeline;
pub mod release;
pub mod storage;
pub mod version_file;

pub use config::FinlyConfig;
pub use pipeline::{FinlyOutcome, FinlyPipeline};
pub use release::SkipReason;
pub use version_file::VersionFile;
