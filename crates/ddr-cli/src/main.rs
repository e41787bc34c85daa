//! ddrgen - Generate a Detailed Diagnostic Report from inspection documents.

use anyhow::Context;
use clap::Parser;
use ddr_domain::CancelToken;
use ddr_llm::GeminiProvider;
use ddr_pipeline::{Pipeline, PipelineConfig, PlainTextSource, RunOutcome, TextFileRenderer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Generate a Detailed Diagnostic Report from a visual inspection report
/// and a thermal imaging report.
#[derive(Parser, Debug)]
#[command(name = "ddrgen", version, about)]
struct Cli {
    /// Path to the visual inspection report (plain text)
    #[arg(long)]
    inspection: PathBuf,

    /// Path to the thermal imaging report (plain text)
    #[arg(long)]
    thermal: PathBuf,

    /// Where to write the generated report
    #[arg(long, default_value = "ddr.txt")]
    output: PathBuf,

    /// Model to use for extraction and drafting
    #[arg(long, default_value = "gemini-2.5-flash")]
    model: String,

    /// API key for the hosted model
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Log to stderr so stdout stays clean for scripting
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let toml = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            PipelineConfig::from_toml(&toml).map_err(anyhow::Error::msg)?
        }
        None => PipelineConfig::default(),
    };

    let provider = Arc::new(GeminiProvider::new(cli.api_key, cli.model));
    let pipeline = Pipeline::new(
        provider,
        PlainTextSource::default(),
        TextFileRenderer::new(&cli.output),
        config,
    )?;

    // First Ctrl-C requests a clean stop at the next stage boundary
    let cancel = CancelToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Cancellation requested; stopping after the current stage");
            signal_token.cancel();
        }
    });

    match pipeline.run(&cli.inspection, &cli.thermal, &cancel).await? {
        RunOutcome::Completed(report) => {
            if report.truncated {
                warn!("Source text was truncated to fit the model budget");
            }
            println!("{}", report.output_path.display());
            Ok(())
        }
        RunOutcome::Cancelled => {
            eprintln!("Run cancelled; no report was written.");
            std::process::exit(130);
        }
    }
}
