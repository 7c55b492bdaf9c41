//! jobtext - print the canonical document for a job listing URL.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use jobtext::{ExtractorConfig, JobTextExtractor};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jobtext")]
#[command(about = "Extract a job posting as plain text")]
#[command(version)]
struct Cli {
    /// URL of a single job posting
    url: String,

    /// Config file (TOML, or JSON with a .json extension)
    #[arg(short, long, env = "JOBTEXT_CONFIG")]
    config: Option<PathBuf>,

    /// Log stage transitions
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "jobtext=info"
    } else {
        "jobtext=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ExtractorConfig::load(cli.config.as_deref()).await?;
    let extractor = JobTextExtractor::new(config)?;

    match extractor.extract(&cli.url).await {
        Ok(text) => {
            println!("{}", text);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::debug!("Extraction failed ({}): {:?}", e.kind(), e);
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
