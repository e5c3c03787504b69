//! Deterministic position-keyed PRNG.
//!
//! Pure function: `grid_hash(x, y, z, seq) -> u32`, PCG-style mixing.
//! Backs the random source of the in-memory grid so test runs are reproducible.

/// Hash a block position and sequence number into a pseudo-random u32.
pub fn grid_hash(x: i32, y: i32, z: i32, seq: u32) -> u32 {
    let mut state = (x as u32)
        .wrapping_mul(0x9E3779B9)
        .wrapping_add((y as u32).wrapping_mul(0x517CC1B7))
        .wrapping_add((z as u32).wrapping_mul(0x6C62272E))
        .wrapping_add(seq.wrapping_mul(0x2545F491));

    state ^= state >> 16;
    state = state.wrapping_mul(0x45D9F3B);
    state ^= state >> 16;
    state = state.wrapping_mul(0x45D9F3B);
    state ^= state >> 16;

    state
}

/// Convert a hash value to a float in [0, 1).
pub fn hash_to_unit(hash: u32) -> f64 {
    (hash >> 8) as f64 / 16_777_216.0 // 2^24
}
