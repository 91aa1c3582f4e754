//! Field-level value generators.
//!
//! Identity-like fields (names, emails, order numbers, statuses) are chosen
//! from fixed pools by index arithmetic. Everything else is drawn from a
//! [`StdRng`] seeded for one `(seed, kind, index, stream)` tuple.

pub mod blob;
pub mod numeric;
pub mod timestamp;
pub mod vocabulary;

use rand::rngs::StdRng;
use rand::SeedableRng;
use seed_core::EntityKind;

/// Random stream used for field values.
pub const VALUE_STREAM: u64 = 0;

/// Random stream used for foreign key sampling.
pub const REFERENCE_STREAM: u64 = 1;

/// Compute the RNG seed for one logical index of one entity kind.
///
/// This allows jumping to any index while maintaining determinism.
pub fn index_seed(seed: u64, kind: EntityKind, index: u64, stream: u64) -> u64 {
    seed.wrapping_add(index.wrapping_mul(0x9E3779B97F4A7C15))
        ^ kind.ordinal().wrapping_mul(0xD1B54A32D192ED03)
        ^ stream.wrapping_mul(0xBF58476D1CE4E5B9)
}

/// Seeded RNG for one logical index.
pub fn index_rng(seed: u64, kind: EntityKind, index: u64, stream: u64) -> StdRng {
    StdRng::seed_from_u64(index_seed(seed, kind, index, stream))
}

/// Pick from `pool` by index: `pool[(index * stride) % len]`.
///
/// `stride` should be coprime with the pool length so that every entry is
/// reached.
pub fn pick<'a>(pool: &[&'a str], index: u64, stride: u64) -> &'a str {
    if pool.is_empty() {
        return "";
    }
    let position = index.wrapping_mul(stride) % pool.len() as u64;
    pool[position as usize]
}
