//! Deterministic per-artefact seeding.
//!
//! Deriving one RNG seed per spec index keeps each artefact's search independent of the
//! specs processed before it.

/// Derives a well-mixed seed for the artefact at `index` from a run-wide `base_seed`.
pub fn seed_for_artefact(base_seed: u64, index: usize) -> u64 {
    let i = (index as u64).wrapping_add(1);
    mix_u64(base_seed ^ i.wrapping_mul(0x9E3779B97F4A7C15))
}

/// SplitMix64 finalizer.
#[inline]
fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}
