// Razorpay IFSC ingestion configuration

use crate::common::FetchConfig;
use std::path::PathBuf;

pub const DEFAULT_RELEASE_URL: &str = "https://api.github.com/repos/razorpay/ifsc/releases/latest";
pub const DEFAULT_CSV_ASSET: &str = "IFSC.csv";
pub const DEFAULT_CATALOG_ASSET: &str = "banks.json";
pub const DEFAULT_DATABASE_PATH: &str = "finly/data/finly.db";
pub const DEFAULT_VERSION_FILE: &str = "tools/finly/version.txt";

/// Configuration for the bank flow
#[derive(Debug, Clone)]
pub struct FinlyConfig {
    /// GitHub "latest release" endpoint of the IFSC dataset
    pub release_url: String,

    /// Release asset holding the branch directory
    pub csv_asset: String,

    /// Release asset holding the bank-code catalog
    pub catalog_asset: String,

    /// SQLite database rebuilt by the flow
    pub database_path: PathBuf,

    /// Text file holding the last ingested release tag
    pub version_file: PathBuf,

    pub fetch: FetchConfig,
}

impl Default for FinlyConfig {
    fn default() -> Self {
        FinlyConfig {
            release_url: DEFAULT_RELEASE_URL.to_string(),
            csv_asset: DEFAULT_CSV_ASSET.to_string(),
            catalog_asset: DEFAULT_CATALOG_ASSET.to_string(),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            version_file: PathBuf::from(DEFAULT_VERSION_FILE),
            fetch: FetchConfig::default(),
        }
    }
}

impl FinlyConfig {
    pub fn builder() -> FinlyConfigBuilder {
        FinlyConfigBuilder::default()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.release_url.is_empty() {
            return Err("Release URL cannot be empty".to_string());
        }

        if self.csv_asset.is_empty() {
            return Err("CSV asset name cannot be empty".to_string());
        }

        if self.catalog_asset.is_empty() {
            return Err("Catalog asset name cannot be empty".to_string());
        }

        if self.database_path.as_os_str().is_empty() {
            return Err("Database path cannot be empty".to_string());
        }

        if self.version_file.as_os_str().is_empty() {
            return Err("Version file path cannot be empty".to_string());
        }

        self.fetch.validate()
    }
}

/// Builder for FinlyConfig
#[derive(Debug, Default)]
pub struct FinlyConfigBuilder {
    release_url: Option<String>,
    csv_asset: Option<String>,
    catalog_asset: Option<String>,
    database_path: Option<PathBuf>,
    version_file: Option<PathBuf>,
    fetch: Option<FetchConfig>,
}

impl FinlyConfigBuilder {
    pub fn release_url(mut self, url: impl Into<String>) -> Self {
        self.release_url = Some(url.into());
        self
    }

    pub fn csv_asset(mut self, name: impl Into<String>) -> Self {
        self.csv_asset = Some(name.into());
        self
    }

    pub fn catalog_asset(mut self, name: impl Into<String>) -> Self {
        self.catalog_asset = Some(name.into());
        self
    }

    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }

    pub fn version_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.version_file = Some(path.into());
        self
    }

    pub fn fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = Some(fetch);
        self
    }

    pub fn build(self) -> FinlyConfig {
        let default = FinlyConfig::default();

        FinlyConfig {
            release_url: self.release_url.unwrap_or(default.release_url),
            csv_asset: self.csv_asset.unwrap_or(default.csv_asset),
            catalog_asset: self.catalog_asset.unwrap_or(default.catalog_asset),
            database_path: self.database_path.unwrap_or(default.database_path),
            version_file: self.version_file.unwrap_or(default.version_file),
            fetch: self.fetch.unwrap_or(default.fetch),
        }
    }
}
