use anyhow::{Context, Result};
use clap::Parser;
use rdsetl::{
    config::{self, EtlConfig},
    logging::{self, DEFAULT_LOG_FILE},
    pipeline::{status_line, Pipeline, RunSummary},
    upload::build_s3_store,
    EtlError,
};
use std::path::PathBuf;
use tracing::{error, info};

/// Load a CSV into MySQL, transform it, and publish the result to S3.
#[derive(Parser, Debug)]
struct Args {
    /// `.env` file to read before the environment (default: `./.env` if present)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Log file; lines are appended
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ─── 1) log sink for this run ─────────────────────────────────────
    let log = logging::init(&args.log_file)
        .with_context(|| format!("opening log file {}", args.log_file.display()))?;
    info!(log = %log.path().display(), "startup");

    // ─── 2) configure + run ───────────────────────────────────────────
    let result = run(&args).await;
    match &result {
        Ok(summary) => info!(
            table = %summary.table,
            object_key = %summary.object_key,
            "run finished"
        ),
        Err(EtlError::Config(msg)) => error!("Configuration error: {}", msg),
        // already logged where it happened
        Err(EtlError::Connect(_)) => {}
        Err(e) => error!("Unexpected error occurred: {}", e),
    }

    println!("{}", status_line(&result));
    Ok(())
}

async fn run(args: &Args) -> rdsetl::Result<RunSummary> {
    if let Some(loaded) = config::load_dotenv(args.env_file.as_deref())? {
        info!("loaded environment from {}", loaded);
    }
    let config = EtlConfig::from_env()?;
    info!(file = %config.file_name, db = ?config.db, s3 = ?config.s3, "configuration loaded");

    let store = build_s3_store(&config.s3)?;
    Pipeline::new(config, store).run().await
}
