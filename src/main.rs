use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use user_flag::{ActivityStore, CapabilityClient, ModerationPipeline};

/// Content Moderation System (CMS) - scores comments to report users
/// posting offensive content.
#[derive(Parser, Debug)]
#[command(name = "user-flag", version)]
struct Cli {
    /// The location of the input file
    #[arg(short = 'I', long, default_value = "")]
    input_file: String,

    /// The location of the output file
    #[arg(short = 'O', long, default_value = "")]
    output_file: String,

    /// SQLite database holding per-message results (recreated each run)
    #[arg(long, default_value = "user_activity.sqlite3")]
    database: String,

    /// Translation capability endpoint
    #[arg(long, default_value = "http://localhost:7000")]
    translation_url: String,

    /// Scoring capability endpoint
    #[arg(long, default_value = "http://localhost:8000")]
    scoring_url: String,

    /// Per-call timeout for capability requests, in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Number of rows processed concurrently
    #[arg(long, default_value_t = 1)]
    jobs: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let timeout = Duration::from_secs(cli.timeout_secs);

    let pipeline = ModerationPipeline::new(
        CapabilityClient::new(&cli.translation_url, timeout)?,
        CapabilityClient::new(&cli.scoring_url, timeout)?,
        ActivityStore::new(&cli.database),
    )
    .with_jobs(cli.jobs);

    if let Err(err) = pipeline.process(&cli.input_file, &cli.output_file).await {
        error!(%err, "pipeline run failed");
        std::process::exit(1);
    }
    Ok(())
}
