// GeoNames postal-code ingestion configuration

use crate::common::FetchConfig;
use std::path::PathBuf;

pub const DEFAULT_ARCHIVE_URL: &str = "http://download.geonames.org/export/zip/allCountries.zip";
pub const DEFAULT_MEMBER_NAME: &str = "allCountries.txt";
pub const DEFAULT_DATABASE_PATH: &str = "atlas/data/atlas.db";

/// Configuration for the geo flow
#[derive(Debug, Clone)]
pub struct AtlasConfig {
    /// URL of the GeoNames postal-code ZIP archive
    pub archive_url: String,

    /// Archive member holding the tab-separated records
    pub member_name: String,

    /// SQLite database rebuilt by the flow
    pub database_path: PathBuf,

    pub fetch: FetchConfig,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        AtlasConfig {
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            member_name: DEFAULT_MEMBER_NAME.to_string(),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            fetch: FetchConfig::default(),
        }
    }
}

impl AtlasConfig {
    pub fn builder() -> AtlasConfigBuilder {
        AtlasConfigBuilder::default()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.archive_url.is_empty() {
            return Err("Archive URL cannot be empty".to_string());
        }

        if self.member_name.is_empty() {
            return Err("Archive member name cannot be empty".to_string());
        }

        if self.database_path.as_os_str().is_empty() {
            return Err("Database path cannot be empty".to_string());
        }

        self.fetch.validate()
    }
}

/// Builder for AtlasConfig
#[derive(Debug, Default)]
pub struct AtlasConfigBuilder {
    archive_url: Option<String>,
    member_name: Option<String>,
    database_path: Option<PathBuf>,
    fetch: Option<FetchConfig>,
}

impl AtlasConfigBuilder {
    pub fn archive_url(mut self, url: impl Into<String>) -> Self {
        self.archive_url = Some(url.into());
        self
    }

    pub fn member_name(mut self, name: impl Into<String>) -> Self {
        self.member_name = Some(name.into());
        self
    }

    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }

    pub fn fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = Some(fetch);
        self
    }

    pub fn build(self) -> AtlasConfig {
        let default = AtlasConfig::default();

        AtlasConfig {
            archive_url: self.archive_url.unwrap_or(default.archive_url),
            member_name: self.member_name.unwrap_or(default.member_name),
            database_path: self.database_path.unwrap_or(default.database_path),
            fetch: self.fetch.unwrap_or(default.fetch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AtlasConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.member_name, "allCountries.txt");
        assert_eq!(config.database_path, PathBuf::from("atlas/data/atlas.db"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = AtlasConfig::builder()
            .archive_url("http://localhost:8080/allCountries.zip")
            .database_path("/tmp/atlas.db")
            .build();

        assert_eq!(config.archive_url, "http://localhost:8080/allCountries.zip");
        assert_eq!(config.database_path, PathBuf::from("/tmp/atlas.db"));
        assert_eq!(config.member_name, DEFAULT_MEMBER_NAME);
    }

    #[test]
    fn test_validation_rejects_empty_fields() {
        let config = AtlasConfig::builder().archive_url("").build();
        assert!(config.validate().is_err());

        let config = AtlasConfig::builder().member_name("").build();
        assert!(config.validate().is_err());

        let config = AtlasConfig::builder().database_path("").build();
        assert!(config.validate().is_err());
    }
}
