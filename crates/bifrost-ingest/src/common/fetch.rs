//! HTTP artifact fetcher
//!
//! Streams upstream artifacts into a caller-supplied sink without holding the
//! whole payload in memory. Every network await is raced against the ambient
//! cancellation token. There are no retries; a failed run is simply re-run.

use crate::error::{IngestError, Result, Stage};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// User agent sent with every request; GitHub rejects requests without one.
pub const DEFAULT_USER_AGENT: &str = concat!("bifrost-ingest/", env!("CARGO_PKG_VERSION"));

/// HTTP client settings shared by both flows
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,

    /// Connection establishment timeout in seconds
    pub connect_timeout_secs: u64,

    /// Overall per-request deadline; `None` leaves deadlines to the caller
    pub timeout_secs: Option<u64>,

    /// Draw a progress bar on stderr while downloading
    pub show_progress: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout_secs: 30,
            timeout_secs: None,
            show_progress: false,
        }
    }
}

impl FetchConfig {
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.user_agent.trim().is_empty() {
            return Err("User agent cannot be empty".to_string());
        }

        if self.connect_timeout_secs == 0 {
            return Err("Connect timeout must be greater than 0".to_string());
        }

        if self.timeout_secs == Some(0) {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Size and media type of a fetched artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArtifact {
    pub size: u64,
    pub content_type: Option<String>,
}

/// Streaming HTTP GET client
pub struct Fetcher {
    client: Client,
    show_progress: bool,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        config.validate().map_err(IngestError::Config)?;

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| IngestError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            show_progress: config.show_progress,
        })
    }

    /// GET `url` and stream the body into `sink`
    pub async fn fetch<W: Write + ?Sized>(
        &self,
        url: &str,
        sink: &mut W,
        cancel: &CancellationToken,
    ) -> Result<FetchedArtifact> {
        debug!(url, "Requesting artifact");

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(IngestError::Canceled { stage: Stage::Acquire }),
            response = self.client.get(url).send() => response.map_err(|source| IngestError::Network {
                url: url.to_string(),
                source,
            })?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let progress = self.progress_bar(response.content_length(), url);

        let mut stream = response.bytes_stream();
        let mut size = 0u64;
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    progress.abandon();
                    return Err(IngestError::Canceled { stage: Stage::Acquire });
                },
                next = stream.next() => next,
            };
            let Some(chunk) = next else {
                break;
            };

            let chunk = chunk.map_err(|source| IngestError::Network {
                url: url.to_string(),
                source,
            })?;
            sink.write_all(&chunk)
                .map_err(IngestError::filesystem(Stage::Acquire, format!("write body of {}", url)))?;
            size += chunk.len() as u64;
            progress.set_position(size);
        }

        sink.flush()
            .map_err(IngestError::filesystem(Stage::Acquire, format!("flush body of {}", url)))?;
        progress.finish_and_clear();

        info!(url, bytes = size, "Downloaded artifact");
        Ok(FetchedArtifact { size, content_type })
    }

    /// GET `url` and decode the body as JSON
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let mut body = Vec::new();
        self.fetch(url, &mut body, cancel).await?;

        serde_json::from_slice(&body).map_err(|source| IngestError::Json {
            url: url.to_string(),
            source,
        })
    }

    /// GET `url` into a fresh temporary file, deleted when the handle drops
    pub async fn fetch_to_temp(
        &self,
        url: &str,
        suffix: &str,
        cancel: &CancellationToken,
    ) -> Result<(NamedTempFile, FetchedArtifact)> {
        let mut file = tempfile::Builder::new()
            .prefix("bifrost-")
            .suffix(suffix)
            .tempfile()
            .map_err(IngestError::filesystem(Stage::Acquire, "create temporary file"))?;

        let artifact = self.fetch(url, file.as_file_mut(), cancel).await?;
        debug!(path = %file.path().display(), "Staged artifact in temporary file");

        Ok((file, artifact))
    }

    fn progress_bar(&self, total: Option<u64>, url: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let name = url.rsplit('/').next().unwrap_or(url).to_string();
        match total {
            Some(total) => {
                let pb = ProgressBar::new(total);
                let style = ProgressStyle::default_bar()
                    .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-");
                pb.set_style(style);
                pb.set_message(format!("Downloading {}", name));
                pb
            },
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_message(format!("Downloading {}", name));
                pb
            },
        }
    }
}
