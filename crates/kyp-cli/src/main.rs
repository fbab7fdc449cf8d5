mod config;
mod pipeline;

use std::sync::Arc;

use clap::Parser;
use kyp_ai::{ChatClient, RiskClassifier};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("kyp v{}", env!("CARGO_PKG_VERSION"));

    if cli.api_key.is_none() {
        warn!("GROQ_API_KEY is not set; classifier requests will be unauthenticated");
    }

    let generator = ChatClient::new(cli.api_base.clone(), cli.api_key.clone(), cli.model.clone());
    info!(model = generator.model(), base = %cli.api_base, "classifier backend");
    let classifier = RiskClassifier::new(Arc::new(generator), cli.timeout());

    let output = cli.output_path(chrono::Local::now().naive_local());
    let stats = pipeline::run_pipeline(&cli.input, &output, &classifier, cli.concurrency()).await?;

    eprintln!("Report: {}", stats.output.display());
    eprintln!("{} ({:.1}s)", stats.summary, stats.elapsed_secs);
    Ok(())
}
