//! GitHub release descriptor and version gate

use crate::error::{IngestError, Result};
use serde::Deserialize;
use std::fmt;

/// Subset of the GitHub "latest release" response
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub name: Option<String>,

    pub tag_name: String,

    #[serde(default)]
    pub draft: bool,

    #[serde(default)]
    pub prerelease: bool,

    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// Downloadable file attached to a release
#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
}

/// Why a release does not warrant an ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The release tag equals the persisted one
    UpToDate,
    Draft,
    Prerelease,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::UpToDate => "up_to_date",
            SkipReason::Draft => "draft",
            SkipReason::Prerelease => "prerelease",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Release {
    /// Compare against the persisted tag; `Some` means nothing to do
    pub fn skip_reason(&self, current_version: &str) -> Option<SkipReason> {
        if self.tag_name == current_version {
            Some(SkipReason::UpToDate)
        } else if self.draft {
            Some(SkipReason::Draft)
        } else if self.prerelease {
            Some(SkipReason::Prerelease)
        } else {
            None
        }
    }

    /// Asset named exactly `name`
    pub fn asset(&self, name: &str) -> Result<&Asset> {
        self.assets
            .iter()
            .find(|asset| asset.name == name)
            .ok_or_else(|| IngestError::MissingAsset {
                tag: self.tag_name.clone(),
                name: name.to_string(),
            })
    }
}
