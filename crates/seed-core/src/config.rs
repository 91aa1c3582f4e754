//! Run configuration.
//!
//! [`SeedConfig`] is the raw, user-editable form loaded from YAML. Every field
//! has a default, so an empty document is a valid configuration. It is turned
//! into a [`RunPlan`] by [`SeedConfig::validate`] before any generation or
//! store I/O happens; the plan carries only values that are known to be usable.
//!
//! ```yaml
//! seed: 42
//! volumes:
//!   users: 100000
//!   orders: 250000
//! batch_sizes:
//!   users: 1000
//! blobs:
//!   products:
//!     size_bytes: 10240
//!     fraction_of_rows_with_blob: 0.01
//! progress_interval_rows: 5000
//! reference_domain: committed
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::entity::EntityKind;

/// Default seed for reproducible runs.
pub const DEFAULT_SEED: u64 = 42;

/// Default number of rows between two progress lines.
pub const DEFAULT_PROGRESS_INTERVAL_ROWS: u64 = 5000;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Zero batch size or negative volume for a phase
    #[error("Misconfigured volume for {kind}: {message}")]
    MisconfiguredVolume { kind: EntityKind, message: String },

    /// Blob settings that cannot be applied
    #[error("Invalid blob config for {kind}: {message}")]
    InvalidBlobConfig { kind: EntityKind, message: String },

    /// Any other unusable setting
    #[error("Invalid setting '{setting}': {message}")]
    InvalidSetting { setting: String, message: String },
}

/// Which id range the resolver samples foreign keys from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceDomain {
    /// Sample within the parent's committed count. Never produces skips
    /// unless the parent has no committed rows at all.
    #[default]
    Committed,

    /// Sample within the parent's configured volume and drop records whose
    /// sampled id is above the committed count.
    Configured,
}

/// Blob settings for one blob-bearing entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlobConfig {
    /// Payload length in bytes.
    pub size_bytes: usize,
    /// Share of the phase volume (taken from the first logical indices) that
    /// carries a payload.
    pub fraction_of_rows_with_blob: f64,
}

/// Raw run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Seed governing every pseudo-random draw.
    pub seed: u64,

    /// Total rows per entity kind. Kinds not listed use their default.
    pub volumes: BTreeMap<EntityKind, i64>,

    /// Rows per flush per entity kind. Kinds not listed use their default.
    pub batch_sizes: BTreeMap<EntityKind, i64>,

    /// Blob settings per blob-bearing kind. Kinds not listed use their default.
    pub blobs: BTreeMap<EntityKind, BlobConfig>,

    /// Rows between progress lines; 0 logs only when a phase completes.
    pub progress_interval_rows: u64,

    /// Foreign key sampling domain.
    pub reference_domain: ReferenceDomain,

    /// Number of blocking tasks a batch is generated on.
    pub generation_workers: usize,

    /// Open a monitor span around every flush, not only around each phase.
    pub batch_spans: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            volumes: BTreeMap::new(),
            batch_sizes: BTreeMap::new(),
            blobs: BTreeMap::new(),
            progress_interval_rows: DEFAULT_PROGRESS_INTERVAL_ROWS,
            reference_domain: ReferenceDomain::default(),
            generation_workers: 1,
            batch_spans: false,
        }
    }
}

/// Default total rows for a kind.
pub fn default_volume(kind: EntityKind) -> i64 {
    match kind {
        EntityKind::Department => 50,
        EntityKind::Category => 100,
        EntityKind::User => 10_000,
        EntityKind::Product => 5_000,
        EntityKind::Order => 20_000,
        EntityKind::OrderItem => 50_000,
    }
}

/// Default batch size for a kind. Blob-bearing kinds flush smaller batches.
pub fn default_batch_size(kind: EntityKind) -> i64 {
    match kind {
        EntityKind::Department => 50,
        EntityKind::Category => 100,
        EntityKind::User => 1000,
        EntityKind::Product => 200,
        EntityKind::Order => 200,
        EntityKind::OrderItem => 2000,
    }
}

/// Default blob settings for a kind, if it carries a blob column.
pub fn default_blob(kind: EntityKind) -> Option<BlobConfig> {
    match kind {
        EntityKind::Product => Some(BlobConfig {
            size_bytes: 10 * 1024,
            fraction_of_rows_with_blob: 0.01,
        }),
        EntityKind::Order => Some(BlobConfig {
            size_bytes: 50 * 1024,
            fraction_of_rows_with_blob: 0.001,
        }),
        _ => None,
    }
}

impl SeedConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Effective (possibly invalid) volume for a kind.
    pub fn volume(&self, kind: EntityKind) -> i64 {
        self.volumes
            .get(&kind)
            .copied()
            .unwrap_or_else(|| default_volume(kind))
    }

    /// Effective (possibly invalid) batch size for a kind.
    pub fn batch_size(&self, kind: EntityKind) -> i64 {
        self.batch_sizes
            .get(&kind)
            .copied()
            .unwrap_or_else(|| default_batch_size(kind))
    }

    /// Effective blob settings for a kind.
    pub fn blob(&self, kind: EntityKind) -> Option<BlobConfig> {
        self.blobs.get(&kind).copied().or_else(|| default_blob(kind))
    }

    /// Validate every phase and build the run plan.
    ///
    /// Fails fast on the first unusable setting, before anything is generated.
    pub fn validate(&self) -> Result<RunPlan, ConfigError> {
        if self.generation_workers == 0 {
            return Err(ConfigError::InvalidSetting {
                setting: "generation_workers".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        for kind in self.blobs.keys() {
            if kind.blob_column().is_none() {
                return Err(ConfigError::InvalidBlobConfig {
                    kind: *kind,
                    message: "entity kind has no blob column".to_string(),
                });
            }
        }

        let mut phases = Vec::with_capacity(EntityKind::ALL.len());
        for kind in EntityKind::ALL {
            phases.push(self.validate_phase(kind)?);
        }

        Ok(RunPlan {
            seed: self.seed,
            phases,
            progress_interval_rows: self.progress_interval_rows,
            reference_domain: self.reference_domain,
            generation_workers: self.generation_workers,
            batch_spans: self.batch_spans,
        })
    }

    fn validate_phase(&self, kind: EntityKind) -> Result<PhasePlan, ConfigError> {
        let volume = self.volume(kind);
        if volume < 0 {
            return Err(ConfigError::MisconfiguredVolume {
                kind,
                message: format!("total volume must not be negative, got {volume}"),
            });
        }

        let batch_size = self.batch_size(kind);
        if batch_size <= 0 {
            return Err(ConfigError::MisconfiguredVolume {
                kind,
                message: format!("batch size must be positive, got {batch_size}"),
            });
        }

        let volume = volume as u64;
        let blob = match self.blob(kind) {
            Some(blob) => {
                let fraction = blob.fraction_of_rows_with_blob;
                if !(0.0..=1.0).contains(&fraction) {
                    return Err(ConfigError::InvalidBlobConfig {
                        kind,
                        message: format!(
                            "fraction_of_rows_with_blob must be within [0, 1], got {fraction}"
                        ),
                    });
                }
                let rows_with_blob = (volume as f64 * fraction).floor() as u64;
                Some(BlobPlan {
                    size_bytes: blob.size_bytes,
                    rows_with_blob: rows_with_blob.min(volume),
                })
            }
            None => None,
        };

        Ok(PhasePlan {
            kind,
            volume,
            batch_size: batch_size as usize,
            blob,
        })
    }
}

/// Resolved blob settings for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlobPlan {
    pub size_bytes: usize,
    /// Records with logical index below this value carry a payload.
    pub rows_with_blob: u64,
}

impl BlobPlan {
    pub fn applies_to(&self, index: u64) -> bool {
        self.size_bytes > 0 && index < self.rows_with_blob
    }
}

/// Validated configuration for a single phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhasePlan {
    pub kind: EntityKind,
    pub volume: u64,
    pub batch_size: usize,
    pub blob: Option<BlobPlan>,
}

impl PhasePlan {
    /// `ceil(volume / batch_size)`.
    pub fn batch_count(&self) -> u64 {
        self.volume.div_ceil(self.batch_size as u64)
    }

    /// Number of records in the batch starting at `offset` (0-based row offset
    /// within the phase). The last batch may be short.
    pub fn batch_len_at(&self, offset: u64) -> usize {
        let remaining = self.volume.saturating_sub(offset);
        remaining.min(self.batch_size as u64) as usize
    }
}

/// Validated run configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunPlan {
    pub seed: u64,
    /// One entry per [`EntityKind`], in [`EntityKind::ALL`] order.
    phases: Vec<PhasePlan>,
    pub progress_interval_rows: u64,
    pub reference_domain: ReferenceDomain,
    pub generation_workers: usize,
    pub batch_spans: bool,
}

impl RunPlan {
    /// Plan for one phase.
    pub fn phase(&self, kind: EntityKind) -> &PhasePlan {
        // `validate` pushes exactly one plan per kind in declaration order.
        &self.phases[kind as usize]
    }

    /// All phase plans in dependency order.
    pub fn phases(&self) -> &[PhasePlan] {
        &self.phases
    }
}
