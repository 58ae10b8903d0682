//! GeoNames postal-code ingestion pipeline
//!
//! Downloads `allCountries.zip`, streams the tab-separated member straight
//! out of the archive and rebuilds `geo_location` in one transaction.

use std::path::Path;

use tempfile::NamedTempFile;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, Instrument};

use super::config::AtlasConfig;
use super::parser;
use super::storage::GeoLocations;
use crate::common::{records, Archive, DecodeOptions, Fetcher, Materializer};
use crate::error::{IngestError, Result};

/// Outcome of a successful geo run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasSummary {
    /// Size of the downloaded archive in bytes
    pub archive_bytes: u64,

    /// Rows now held by `geo_location`
    pub rows: u64,
}

/// GeoNames ingestion pipeline
pub struct AtlasPipeline {
    config: AtlasConfig,
}

impl AtlasPipeline {
    pub fn new(config: AtlasConfig) -> Self {
        Self { config }
    }

    /// Run the full ingestion
    ///
    /// Steps:
    /// 1. Download the archive to a temporary file
    /// 2. Locate the postal-code member
    /// 3. Decode, normalize and insert every record in one transaction
    ///
    /// A failure is logged once before it is returned.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<AtlasSummary> {
        let result = self
            .execute(cancel)
            .instrument(info_span!("ingest", flow = "atlas"))
            .await;

        if let Err(e) = &result {
            e.report();
        }
        result
    }

    async fn execute(&self, cancel: &CancellationToken) -> Result<AtlasSummary> {
        self.config.validate().map_err(IngestError::Config)?;
        let fetcher = Fetcher::new(&self.config.fetch)?;

        info!(url = %self.config.archive_url, "Phase 1: Downloading GeoNames archive");
        let (archive_file, artifact) = fetcher
            .fetch_to_temp(&self.config.archive_url, ".zip", cancel)
            .await?;

        info!(member = %self.config.member_name, "Phase 2: Loading postal codes");
        let member = self.config.member_name.clone();
        let database_path = self.config.database_path.clone();
        let cancel = cancel.clone();
        let span = tracing::Span::current();

        let rows = tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            load(archive_file, &member, &database_path, &cancel)
        })
        .await
        .unwrap_or_else(|e| std::panic::resume_unwind(e.into_panic()))?;

        info!(rows, "update successful");
        Ok(AtlasSummary {
            archive_bytes: artifact.size,
            rows,
        })
    }
}

/// Decode the archive member and rebuild the table
///
/// Consumes the staged archive so it is deleted on every return path.
fn load(
    archive_file: NamedTempFile,
    member: &str,
    database_path: &Path,
    cancel: &CancellationToken,
) -> Result<u64> {
    let mut archive = Archive::open(archive_file.path())?;
    let reader = archive.member(member)?;

    let locations = records(reader, DecodeOptions::tab_separated())
        .map(|record| record.and_then(|record| parser::normalize(&record)));

    let mut materializer = Materializer::open(database_path)?;
    materializer.replace::<GeoLocations, _, _>(locations, cancel, |_| Ok(()))
}
