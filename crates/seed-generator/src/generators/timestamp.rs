//! Timestamp value generators.

use chrono::{DateTime, Utc};
use rand::Rng;

/// 2020-01-01T00:00:00Z
pub const RANGE_START: i64 = 1_577_836_800;

/// 2025-01-01T00:00:00Z
pub const RANGE_END: i64 = 1_735_689_600;

/// Generate a timestamp with second precision in `[start, end)` (unix seconds).
pub fn generate_timestamp_range<R: Rng>(rng: &mut R, start: i64, end: i64) -> DateTime<Utc> {
    let seconds = if start >= end {
        start
    } else {
        rng.random_range(start..end)
    };
    DateTime::from_timestamp(seconds, 0).unwrap_or(DateTime::UNIX_EPOCH)
}
