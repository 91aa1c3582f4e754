//! `sample` command: print generated records without writing them.

use anyhow::Context;
use clap::Args;
use seed_core::{EntityKind, SeedConfig};
use seed_generator::RecordGenerator;
use std::io::Write;
use std::path::PathBuf;

#[derive(Args, Clone, Debug)]
pub struct SampleArgs {
    /// Entity kind to draft (e.g. users, orders, order-items)
    #[arg(long)]
    pub kind: EntityKind,

    /// Number of records to print
    #[arg(long, default_value = "10")]
    pub count: u64,

    /// First logical index
    #[arg(long, default_value = "0")]
    pub start: u64,

    /// Run configuration YAML (for seed and blob settings)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Random seed, overriding the configuration
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Write drafted records as JSON lines to stdout.
///
/// Foreign keys are unresolved (`null`) since nothing is committed.
pub fn run_sample(args: &SampleArgs) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_sample(args, &mut out)
}

pub fn write_sample<W: Write>(args: &SampleArgs, out: &mut W) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => SeedConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {path:?}"))?,
        None => SeedConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let plan = config.validate().context("Invalid run configuration")?;
    let generator = RecordGenerator::from_plan(&plan);

    for record in generator.records(args.kind, args.start, args.count) {
        serde_json::to_writer(&mut *out, &record)?;
        writeln!(out)?;
    }
    Ok(())
}
