//! GeoNames postal-code ingestion
//!
//! Rebuilds the `geo_location` table of `atlas.db` from the GeoNames
//! `allCountries.zip` dump.

pub mod config;
pub mod parser;
pub mod pipeline;
pub mod storage;

pub use config::AtlasConfig;
pub use pipeline::{AtlasPipeline, AtlasSummary};
