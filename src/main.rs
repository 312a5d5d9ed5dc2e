//! Command-line interface for fixture-seed
//!
//! # Usage Examples
//!
//! ## Generate
//! ```bash
//! # Print resolved fixtures as JSON
//! fixture-seed generate --config demos/blog.yaml
//!
//! # Same data, written to a file, with an explicit seed
//! fixture-seed generate --config demos/blog.yaml --seed 7 --output fixtures.json
//! ```
//!
//! ## Seed
//! ```bash
//! # Materialize into a JSONL log of create/update calls
//! fixture-seed seed --config demos/blog.yaml --output store.jsonl
//!
//! # Build and materialize in memory only
//! fixture-seed seed --config demos/blog.yaml --dry-run
//! ```
//!
//! Logging is controlled with `RUST_LOG` (e.g. `RUST_LOG=fixture_generator=debug`).

use anyhow::Context;
use clap::{Parser, Subcommand};
use fixture_populate::{GenerateArgs, JsonlStore, RecordingStore, SeedArgs};
use fixture_seed::{engine_from_config, generate_fixtures, load_config, seed_store};

#[derive(Parser)]
#[command(name = "fixture-seed")]
#[command(about = "Generate related fixture data and seed it into stores")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build fixtures and print them as JSON
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },

    /// Build fixtures and materialize them (create pass, then connect pass)
    Seed {
        #[command(flatten)]
        args: SeedArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { args } => run_generate(args).await,
        Commands::Seed { args } => run_seed(args).await,
    }
}

async fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let config = load_config(&args.common.config)?;
    let seed = args.common.resolve_seed(config.seed);

    tracing::info!(
        "Generating fixtures for {} models (seed={})",
        config.models.len(),
        seed
    );

    let fixtures = generate_fixtures(&config, seed)?;
    let json = serde_json::to_string_pretty(&fixtures).context("Failed to serialize fixtures")?;

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, format!("{json}\n"))
                .await
                .with_context(|| format!("Failed to write fixtures to {path:?}"))?;
            tracing::info!("Wrote fixtures to {:?}", path);
        }
        None => println!("{json}"),
    }

    Ok(())
}

async fn run_seed(args: SeedArgs) -> anyhow::Result<()> {
    let config = load_config(&args.common.config)?;
    let seed = args.common.resolve_seed(config.seed);
    let mut engine = engine_from_config(&config, seed);

    tracing::info!(
        "Seeding fixtures for {} models (seed={}, dry_run={})",
        config.models.len(),
        seed,
        args.dry_run
    );

    if args.dry_run {
        let store = RecordingStore::new();
        let report = seed_store(&mut engine, &store).await?;
        tracing::info!(
            "Dry run: {} creates, {} updates in {:?}",
            report.created,
            report.connected,
            report.total_duration
        );
        return Ok(());
    }

    let output = args
        .output
        .context("--output is required unless --dry-run is set")?;
    let store = JsonlStore::create(&output)
        .await
        .with_context(|| format!("Failed to create store file {output:?}"))?;

    let report = seed_store(&mut engine, &store).await?;
    let lines = store
        .finish()
        .await
        .with_context(|| format!("Failed to flush store file {output:?}"))?;

    tracing::info!(
        "Seeded {}: {} created, {} connected, {} lines in {:?}",
        output.display(),
        report.created,
        report.connected,
        lines,
        report.total_duration
    );

    Ok(())
}
