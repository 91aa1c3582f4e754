//! Numeric value generators.

use rand::Rng;
use rust_decimal::Decimal;

/// Generate a money amount in `[min_cents, max_cents)`, with two decimal places.
pub fn generate_money<R: Rng>(rng: &mut R, min_cents: i64, max_cents: i64) -> Decimal {
    if min_cents >= max_cents {
        return Decimal::new(min_cents, 2);
    }
    Decimal::new(rng.random_range(min_cents..max_cents), 2)
}

/// Generate a random integer in the given range (inclusive).
pub fn generate_int_range<R: Rng>(rng: &mut R, min: i32, max: i32) -> i32 {
    if min >= max {
        return min;
    }
    rng.random_range(min..=max)
}
