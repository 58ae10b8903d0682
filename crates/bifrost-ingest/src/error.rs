//! Error types for the ingestion pipeline
//!
//! Every failure knows the pipeline [`Stage`] it originated in and a stable,
//! machine-readable cause code, so the flow drivers can emit one structured
//! failure record without inspecting error messages.

use std::fmt;
use thiserror::Error;
use tracing::{error, warn};

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Pipeline stage an error originated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// HTTP fetch of upstream artifacts and asset selection
    Acquire,
    /// Comparison of the upstream release tag with the persisted one
    VersionGate,
    /// ZIP, JSON and delimited-text decoding
    Decode,
    /// Coercion of raw fields into typed records
    Normalize,
    /// Bank-code join against the catalog
    Enrich,
    /// Schema rebuild and bulk insert inside the load transaction
    Materialize,
    /// Transaction commit and version marker rewrite
    Commit,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Acquire => "acquire",
            Stage::VersionGate => "version_gate",
            Stage::Decode => "decode",
            Stage::Normalize => "normalize",
            Stage::Enrich => "enrich",
            Stage::Materialize => "materialize",
            Stage::Commit => "commit",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for ingestion runs
///
/// Every variant is fatal for the run; [`IngestError::Canceled`] is only
/// reported differently.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to decode JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to read delimited record: {0}")]
    Csv(#[from] csv::Error),

    #[error("Member '{member}' not found in archive {archive}")]
    MemberNotFound { archive: String, member: String },

    #[error("Release {tag} has no asset named '{name}'")]
    MissingAsset { tag: String, name: String },

    #[error("Line {line}: invalid {column}: {message}")]
    Parse {
        line: u64,
        column: &'static str,
        message: String,
    },

    #[error("Line {line}: IFSC '{ifsc}' is shorter than four characters")]
    CorruptRecord { line: u64, ifsc: String },

    #[error("Database error ({operation}): {source}")]
    Database {
        stage: Stage,
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Filesystem error ({context}): {source}")]
    Filesystem {
        stage: Stage,
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Ingestion canceled during {stage} stage")]
    Canceled { stage: Stage },
}

impl IngestError {
    /// Stage the error originated in
    pub fn stage(&self) -> Stage {
        match self {
            IngestError::Config(_)
            | IngestError::Network { .. }
            | IngestError::HttpStatus { .. }
            | IngestError::MissingAsset { .. } => Stage::Acquire,
            IngestError::Json { .. }
            | IngestError::Zip(_)
            | IngestError::Csv(_)
            | IngestError::MemberNotFound { .. } => Stage::Decode,
            IngestError::Parse { .. } => Stage::Normalize,
            IngestError::CorruptRecord { .. } => Stage::Enrich,
            IngestError::Database { stage, .. }
            | IngestError::Filesystem { stage, .. }
            | IngestError::Canceled { stage } => *stage,
        }
    }

    /// Stable machine-readable cause code
    pub fn cause(&self) -> &'static str {
        match self {
            IngestError::Config(_) => "config_error",
            IngestError::Network { .. } => "network_error",
            IngestError::HttpStatus { .. } => "http_status_error",
            IngestError::Json { .. } | IngestError::Zip(_) | IngestError::Csv(_) => "decode_error",
            IngestError::MemberNotFound { .. } | IngestError::MissingAsset { .. } => {
                "member_not_found"
            },
            IngestError::Parse { .. } | IngestError::CorruptRecord { .. } => "parse_error",
            IngestError::Database { .. } => "database_error",
            IngestError::Filesystem { .. } => "filesystem_error",
            IngestError::Canceled { .. } => "canceled",
        }
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, IngestError::Canceled { .. })
    }

    /// Emit the single structured record for a failed run
    pub fn report(&self) {
        if self.is_canceled() {
            warn!(stage = %self.stage(), cause = self.cause(), "ingestion canceled");
        } else {
            error!(
                stage = %self.stage(),
                cause = self.cause(),
                error = %self,
                "ingestion failed"
            );
        }
    }

    /// Build a mapper for SQLite failures inside the load transaction
    pub(crate) fn database(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| IngestError::Database {
            stage: Stage::Materialize,
            operation,
            source,
        }
    }

    /// Build a mapper for filesystem failures
    pub(crate) fn filesystem(
        stage: Stage,
        context: impl Into<String>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let context = context.into();
        move |source| IngestError::Filesystem {
            stage,
            context,
            source,
        }
    }
}
