//! Razorpay IFSC ingestion pipeline
//!
//! Gated on the upstream release tag: when the latest GitHub release matches
//! the tag in the version file, or is a draft or prerelease, nothing is
//! downloaded and nothing is written.

use std::fs::File;
use std::path::Path;

use tempfile::NamedTempFile;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, Instrument};

use super::catalog::{BankCodeCatalog, CatalogDocument};
use super::config::FinlyConfig;
use super::parser;
use super::release::{Release, SkipReason};
use super::storage::{self, Banks};
use super::version_file::VersionFile;
use crate::common::{records, DecodeOptions, Fetcher, Materializer};
use crate::error::{IngestError, Result, Stage};

/// Outcome of a successful bank run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinlyOutcome {
    /// Tables rebuilt and the version file rewritten
    Updated {
        current_version: String,
        latest_version: String,
        rows: u64,
    },

    /// The release did not pass the version gate
    Skipped {
        current_version: String,
        latest_version: String,
        reason: SkipReason,
    },
}

/// Release that passed the gate and the files to ingest from it
struct PendingRelease {
    tag: String,
    csv_name: String,
    csv_url: String,
    catalog_url: String,
}

/// Razorpay IFSC ingestion pipeline
pub struct FinlyPipeline {
    config: FinlyConfig,
}

impl FinlyPipeline {
    pub fn new(config: FinlyConfig) -> Self {
        Self { config }
    }

    /// Run the full ingestion
    ///
    /// Steps:
    /// 1. Fetch the latest release descriptor
    /// 2. Compare its tag with the version file and stop if nothing changed
    /// 3. Fetch the bank-code catalog and the branch CSV
    /// 4. Rebuild `bank` and `version` in one transaction
    /// 5. Rewrite the version file
    ///
    /// A failure is logged once before it is returned.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<FinlyOutcome> {
        let result = self
            .execute(cancel)
            .instrument(info_span!("ingest", flow = "finly"))
            .await;

        if let Err(e) = &result {
            e.report();
        }
        result
    }

    async fn execute(&self, cancel: &CancellationToken) -> Result<FinlyOutcome> {
        self.config.validate().map_err(IngestError::Config)?;
        let fetcher = Fetcher::new(&self.config.fetch)?;
        let version_file = VersionFile::new(&self.config.version_file);

        info!(url = %self.config.release_url, "Phase 1: Fetching latest release");
        let release: Release = fetcher.fetch_json(&self.config.release_url, cancel).await?;

        info!(tag = %release.tag_name, "Phase 2: Checking persisted version");
        let current_version = version_file.read()?;
        if let Some(reason) = release.skip_reason(&current_version) {
            info!(
                current_version = %current_version,
                latest_version = %release.tag_name,
                reason = %reason,
                "no update required"
            );
            return Ok(FinlyOutcome::Skipped {
                current_version,
                latest_version: release.tag_name,
                reason,
            });
        }

        let pending = self.select_assets(&release)?;

        info!(url = %pending.catalog_url, "Phase 3: Fetching bank-code catalog");
        let document: CatalogDocument = fetcher.fetch_json(&pending.catalog_url, cancel).await?;
        let catalog = BankCodeCatalog::from_document(document);
        info!(entries = catalog.len(), "Loaded bank-code catalog");

        info!(url = %pending.csv_url, "Phase 4: Downloading branch directory");
        let (csv_file, _) = fetcher.fetch_to_temp(&pending.csv_url, ".csv", cancel).await?;

        info!("Phase 5: Loading branches");
        let database_path = self.config.database_path.clone();
        let load_cancel = cancel.clone();
        let span = tracing::Span::current();
        let PendingRelease { tag, csv_name, .. } = pending;
        let load_tag = tag.clone();

        let rows = tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            load(csv_file, &catalog, &database_path, &csv_name, &load_tag, &load_cancel)
        })
        .await
        .unwrap_or_else(|e| std::panic::resume_unwind(e.into_panic()))?;

        version_file.write(&tag)?;

        info!(
            current_version = %current_version,
            latest_version = %tag,
            rows,
            "update successful"
        );
        Ok(FinlyOutcome::Updated {
            current_version,
            latest_version: tag,
            rows,
        })
    }

    fn select_assets(&self, release: &Release) -> Result<PendingRelease> {
        let csv = release.asset(&self.config.csv_asset)?;
        let catalog = release.asset(&self.config.catalog_asset)?;

        Ok(PendingRelease {
            tag: release.tag_name.clone(),
            csv_name: csv.name.clone(),
            csv_url: csv.browser_download_url.clone(),
            catalog_url: catalog.browser_download_url.clone(),
        })
    }
}

/// Decode, enrich and insert every branch, then record the release
///
/// Consumes the staged CSV so it is deleted on every return path.
fn load(
    csv_file: NamedTempFile,
    catalog: &BankCodeCatalog,
    database_path: &Path,
    asset_name: &str,
    tag: &str,
    cancel: &CancellationToken,
) -> Result<u64> {
    let file = File::open(csv_file.path()).map_err(IngestError::filesystem(
        Stage::Decode,
        format!("open {}", csv_file.path().display()),
    ))?;

    let mut rows = records(file, DecodeOptions::comma_separated());
    match rows.next() {
        Some(header) => {
            header?;
        },
        None => {
            return Err(IngestError::Parse {
                line: 1,
                column: "header",
                message: format!("{} is empty", asset_name),
            })
        },
    }

    let banks = rows.map(|record| {
        record
            .and_then(|record| parser::normalize(&record))
            .and_then(|row| catalog.enrich(row))
    });

    let mut materializer = Materializer::open(database_path)?;
    materializer.replace::<Banks, _, _>(banks, cancel, |tx| {
        storage::insert_version(tx, asset_name, tag)
    })
}
