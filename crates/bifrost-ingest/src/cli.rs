//! Shared command-line plumbing for the ingestion binaries

use crate::error::IngestError;
use bifrost_common::logging::{LogConfig, LogFormat, LogLevel, LogOutput};
use clap::Args;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Exit status after Ctrl-C, following the shell convention of 128 + SIGINT
pub const EXIT_CANCELED: u8 = 130;

/// Logging flags common to every binary
#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    /// Verbose output, with source locations
    #[arg(short, long)]
    pub verbose: bool,

    /// Log format (text or json)
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Where logs go (console, file or both)
    #[arg(long, default_value = "console")]
    pub log_output: LogOutput,

    /// Directory for daily log files
    #[arg(long, default_value = "./logs")]
    pub log_dir: PathBuf,

    /// Extra filter directives, e.g. "reqwest=warn,bifrost_ingest=debug"
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl LogArgs {
    pub fn log_config(&self, prefix: &str) -> LogConfig {
        let level = if self.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        };

        let builder = LogConfig::builder()
            .level(level)
            .include_location(self.verbose)
            .format(self.log_format.clone())
            .output(self.log_output.clone())
            .log_dir(self.log_dir.clone())
            .log_file_prefix(prefix);

        match &self.log_filter {
            Some(filter) => builder.filter_directives(filter.as_str()).build(),
            None => builder.build(),
        }
    }
}

/// Cancel `token` on the first Ctrl-C
pub fn cancel_on_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, canceling");
            token.cancel();
        }
    });
}

/// Process exit status for a finished run
pub fn exit_status<T>(result: &Result<T, IngestError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(e) if e.is_canceled() => EXIT_CANCELED,
        Err(_) => 1,
    }
}

pub fn exit_code<T>(result: &Result<T, IngestError>) -> ExitCode {
    ExitCode::from(exit_status(result))
}
