//! atlas-ingest - rebuild the GeoNames postal-code database

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use bifrost_common::logging::init_logging;
use bifrost_ingest::atlas::{AtlasConfig, AtlasPipeline};
use bifrost_ingest::cli::{self, LogArgs};
use bifrost_ingest::common::FetchConfig;
use clap::Parser;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "atlas-ingest")]
#[command(author, version, about = "Rebuild atlas.db from the GeoNames postal-code dump")]
struct Cli {
    #[command(flatten)]
    logging: LogArgs,

    /// Database file to rebuild
    #[arg(long, default_value = bifrost_ingest::atlas::config::DEFAULT_DATABASE_PATH)]
    database: PathBuf,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    let _guard = init_logging(&args.logging.log_config("atlas-ingest"))?;

    let cancel = CancellationToken::new();
    cli::cancel_on_interrupt(cancel.clone());

    let config = AtlasConfig::builder()
        .database_path(args.database)
        .fetch(FetchConfig::default().with_progress(true))
        .build();

    let result = AtlasPipeline::new(config).run(&cancel).await;
    Ok(cli::exit_code(&result))
}
