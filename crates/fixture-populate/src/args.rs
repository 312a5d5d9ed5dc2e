//! CLI argument definitions shared by the fixture commands.

use clap::Args;
use fixture_generator::DEFAULT_SEED;
use std::path::PathBuf;

/// Arguments common to every fixture command.
#[derive(Args, Clone, Debug)]
pub struct CommonFixtureArgs {
    /// Path to the fixture YAML file (models and definitions)
    #[arg(long, short = 'c')]
    pub config: PathBuf,

    /// Random seed (overrides the seed in the fixture file; default 42)
    #[arg(long, env = "FIXTURE_SEED")]
    pub seed: Option<u64>,
}

impl CommonFixtureArgs {
    /// Seed to use: the flag, then the file's seed, then the default.
    pub fn resolve_seed(&self, config_seed: Option<u64>) -> u64 {
        self.seed.or(config_seed).unwrap_or(DEFAULT_SEED)
    }
}

/// Arguments of `generate`.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Write the fixtures JSON here instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonFixtureArgs,
}

/// Arguments of `seed`.
#[derive(Args, Clone, Debug)]
pub struct SeedArgs {
    /// Output JSONL file receiving one line per store call
    #[arg(long, short = 'o', required_unless_present = "dry_run")]
    pub output: Option<PathBuf>,

    /// Materialize into memory only and log the call counts
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub common: CommonFixtureArgs,
}
