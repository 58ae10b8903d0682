//! finly-ingest - rebuild the IFSC bank directory database

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use bifrost_common::logging::init_logging;
use bifrost_ingest::cli::{self, LogArgs};
use bifrost_ingest::common::FetchConfig;
use bifrost_ingest::finly::config::{DEFAULT_DATABASE_PATH, DEFAULT_VERSION_FILE};
use bifrost_ingest::finly::{FinlyConfig, FinlyPipeline};
use clap::Parser;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "finly-ingest")]
#[command(author, version, about = "Rebuild finly.db from the latest razorpay/ifsc release")]
struct Cli {
    #[command(flatten)]
    logging: LogArgs,

    /// Database file to rebuild
    #[arg(long, default_value = DEFAULT_DATABASE_PATH)]
    database: PathBuf,

    /// File holding the last ingested release tag
    #[arg(long, default_value = DEFAULT_VERSION_FILE)]
    version_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    let _guard = init_logging(&args.logging.log_config("finly-ingest"))?;

    let cancel = CancellationToken::new();
    cli::cancel_on_interrupt(cancel.clone());

    let config = FinlyConfig::builder()
        .database_path(args.database)
        .version_file(args.version_file)
        .fetch(FetchConfig::default().with_progress(true))
        .build();

    let result = FinlyPipeline::new(config).run(&cancel).await;
    Ok(cli::exit_code(&result))
}
