//! Common CLI argument definitions shared by all populate targets.

use clap::Args;
use seed_core::{ConfigError, EntityKind, ReferenceDomain, SeedConfig};
use std::path::PathBuf;

/// Common arguments shared by every `populate` subcommand.
#[derive(Args, Clone, Debug, Default)]
pub struct CommonPopulateArgs {
    /// Path to a run configuration YAML file (defaults apply when omitted)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Random seed for deterministic generation (same seed = same data)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override a phase volume, e.g. `--volume users=500` (repeatable)
    #[arg(long = "volume", value_parser = parse_kind_value)]
    pub volumes: Vec<(EntityKind, i64)>,

    /// Override a phase batch size, e.g. `--batch-size orders=100` (repeatable)
    #[arg(long = "batch-size", value_parser = parse_kind_value)]
    pub batch_sizes: Vec<(EntityKind, i64)>,

    /// Rows between progress lines (0 = only when a phase completes)
    #[arg(long)]
    pub progress_interval: Option<u64>,

    /// Number of blocking tasks each batch is generated on
    #[arg(long)]
    pub workers: Option<usize>,

    /// Sample foreign keys within the parent's configured volume instead of
    /// its committed count
    #[arg(long)]
    pub configured_references: bool,

    /// Record a timing span around every batch flush
    #[arg(long)]
    pub batch_spans: bool,

    /// Directory to write phase checkpoints to
    #[arg(long)]
    pub checkpoint_dir: Option<PathBuf>,

    /// Continue from the latest checkpoint (or current row counts) instead of
    /// starting from empty tables
    #[arg(long)]
    pub resume: bool,

    /// Write the run report as JSON to this file
    #[arg(long)]
    pub report_json: Option<PathBuf>,

    /// Dry-run mode: validate configuration without generating or writing data
    #[arg(long)]
    pub dry_run: bool,
}

impl CommonPopulateArgs {
    /// Load the configuration file (if any) and apply command-line overrides.
    pub fn load_config(&self) -> Result<SeedConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => SeedConfig::from_file(path)?,
            None => SeedConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    /// Apply command-line overrides on top of `config`.
    pub fn apply(&self, config: &mut SeedConfig) {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        for (kind, volume) in &self.volumes {
            config.volumes.insert(*kind, *volume);
        }
        for (kind, batch_size) in &self.batch_sizes {
            config.batch_sizes.insert(*kind, *batch_size);
        }
        if let Some(interval) = self.progress_interval {
            config.progress_interval_rows = interval;
        }
        if let Some(workers) = self.workers {
            config.generation_workers = workers;
        }
        if self.configured_references {
            config.reference_domain = ReferenceDomain::Configured;
        }
        if self.batch_spans {
            config.batch_spans = true;
        }
    }
}

/// Parse `kind=value`.
pub fn parse_kind_value(s: &str) -> Result<(EntityKind, i64), String> {
    let (kind, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <kind>=<number>, got '{s}'"))?;
    let kind = kind.trim().parse::<EntityKind>()?;
    let value = value
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid number '{}': {e}", value.trim()))?;
    Ok((kind, value))
}
