//! Binary payload generator.

use rand::Rng;

/// Generate `size` bytes of pseudo-random payload.
pub fn generate_payload<R: Rng>(rng: &mut R, size: usize) -> Vec<u8> {
    let mut payload = vec![0u8; size];
    rng.fill(&mut payload[..]);
    payload
}
