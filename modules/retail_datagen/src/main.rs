//! Retail Datagen CLI
//!
//! Loads the store/year reference catalog and the product catalog, generates
//! a full retail dataset and writes it to a document store.
//!
//! ```bash
//! # Generate into the default SQLite file with a fixed seed
//! retail-datagen --seed 42
//!
//! # Small run into Postgres, settings from YAML plus environment
//! NUM_ORDERS=500 retail-datagen --config datagen.yaml \
//!     --database-url postgres://localhost/retail
//!
//! # Generate without writing anywhere
//! retail-datagen --dry-run -v
//! ```

use anyhow::Context;
use clap::Parser;
use retail_datagen::domain::{Sinks, SourceCatalogs};
use retail_datagen::infra::storage::{InMemorySink, SeaOrmDocumentSink};
use retail_datagen::{Config, GenerationSettings, Pipeline, RunSummary};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Synthetic retail data generator
#[derive(Parser, Debug)]
#[command(name = "retail-datagen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file, layered under the environment
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Store/year reference catalog (overrides REFERENCE_DATA_PATH)
    #[arg(long)]
    reference_data: Option<PathBuf>,

    /// Category/product catalog (overrides PRODUCT_DATA_PATH)
    #[arg(long)]
    product_data: Option<PathBuf>,

    /// Document store connection string (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Target namespace (overrides DATABASE)
    #[arg(long)]
    database: Option<String>,

    /// Seed for the random source (overrides SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Generate into memory and report counts without touching the store
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Generation failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = settings(&cli)?;
    let sources = SourceCatalogs::load(&settings.reference_data_path, &settings.product_data_path)?;

    let sinks = if cli.dry_run {
        tracing::info!("Dry run: documents are kept in memory only");
        Sinks::single(Arc::new(InMemorySink::new()))
    } else {
        let operational = SeaOrmDocumentSink::connect(&settings.database_url, &settings.database)
            .await
            .context("opening document store")?;
        let embeddings = operational.with_namespace(embeddings_namespace(&settings.database));
        Sinks {
            operational: Arc::new(operational),
            embeddings: Arc::new(embeddings),
        }
    };

    let mut pipeline = Pipeline::new(sinks, settings);
    let summary = pipeline.run(&sources).await?;
    report(&pipeline, &summary).await?;
    Ok(())
}

/// Config layers (defaults, YAML, environment), then CLI flags on top
fn settings(cli: &Cli) -> anyhow::Result<GenerationSettings> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(path) = &cli.reference_data {
        config.reference_data_path = path.clone();
    }
    if let Some(path) = &cli.product_data {
        config.product_data_path = path.clone();
    }
    if let Some(url) = &cli.database_url {
        config.database_url = url.clone();
    }
    if let Some(database) = &cli.database {
        config.database = database.clone();
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    Ok(config.validate()?)
}

/// Embeddings live in their own namespace so replication can skip them
fn embeddings_namespace(database: &str) -> String {
    format!("{}-embeddings", database)
}

async fn report(pipeline: &Pipeline, summary: &RunSummary) -> anyhow::Result<()> {
    let counts = pipeline.collection_counts().await?;

    tracing::info!("Database summary ({}):", pipeline.settings().database);
    for (collection, count) in &counts {
        tracing::info!(
            "  {:<20} {:>10} (written this run: {})",
            collection.as_str(),
            count,
            summary.get(*collection)
        );
    }
    Ok(())
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
