use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use fae_extractor::app::extract_use_case::ExtractUseCase;
use fae_extractor::app::normalize_use_case::NormalizeUseCase;
use fae_extractor::config::ExtractorConfig;
use fae_extractor::infra::output_adapter::{InMemoryOutputAdapter, NdjsonOutputAdapter};
use fae_extractor::logging;
use fae_extractor::observability::{self, PipelineStats};

#[derive(Parser)]
#[command(name = "fae_extractor")]
#[command(about = "Family activity extraction and normalization pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment a raw text file and extract candidate events
    Extract {
        /// Path to the raw text document
        #[arg(long)]
        input: PathBuf,
        /// Source URL recorded in stats and provenance
        #[arg(long, default_value = "file://local")]
        source_url: String,
        /// Optional NDJSON output file; results print to stdout regardless
        #[arg(long)]
        output: Option<String>,
    },
    /// Normalize a JSON payload file into a canonical activity
    Normalize {
        /// Path to the JSON payload
        #[arg(long)]
        input: PathBuf,
        /// Declared payload schema: events, activities, venues, or custom
        #[arg(long, default_value = "events")]
        schema_type: String,
        /// Source URL recorded in the canonical record
        #[arg(long, default_value = "file://local")]
        source_url: String,
        /// Optional NDJSON output file; results print to stdout regardless
        #[arg(long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();
    if let Err(e) = observability::init() {
        warn!("Failed to initialize metrics: {}", e);
    }

    let cli = Cli::parse();
    let config = ExtractorConfig::load_or_default();
    let stats = Arc::new(PipelineStats::new());

    match cli.command {
        Commands::Extract {
            input,
            source_url,
            output,
        } => {
            let raw_text = std::fs::read_to_string(&input)?;
            let use_case = match output.as_deref() {
                Some(path) => ExtractUseCase::new(
                    &config,
                    stats.clone(),
                    Box::new(NdjsonOutputAdapter::new(path)?),
                ),
                None => ExtractUseCase::new(
                    &config,
                    stats.clone(),
                    Box::new(InMemoryOutputAdapter::new()),
                ),
            };
            let results = use_case.extract_document(&raw_text, &source_url).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
            info!(events = results.len(), "extraction complete");
        }
        Commands::Normalize {
            input,
            schema_type,
            source_url,
            output,
        } => {
            let payload: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(&input)?)?;
            let use_case = match output.as_deref() {
                Some(path) => NormalizeUseCase::new(
                    &config,
                    stats.clone(),
                    Box::new(NdjsonOutputAdapter::new(path)?),
                ),
                None => NormalizeUseCase::new(
                    &config,
                    stats.clone(),
                    Box::new(InMemoryOutputAdapter::new()),
                ),
            };
            let outcome = use_case
                .normalize_payload(&payload, &schema_type, &source_url)
                .await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            info!(confidence = outcome.confidence, "normalization complete");
        }
    }

    let snapshot = serde_json::to_string(&stats.snapshot())?;
    info!(stats = %snapshot, "pipeline stats");
    Ok(())
}
