//! Deterministic per-chunk seed derivation.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::coord::TileCoord;

/// Derive a u64 seed for a chunk from the world seed and its grid coordinate.
///
/// Uses SipHash (via std's `DefaultHasher`) to combine the inputs into a
/// well-distributed u64.
pub fn derive_chunk_seed(world_seed: u64, chunk: TileCoord) -> u64 {
    let mut hasher = DefaultHasher::new();
    world_seed.hash(&mut hasher);
    chunk.x.hash(&mut hasher);
    chunk.y.hash(&mut hasher);
    hasher.finish()
}

/// Deterministic RNG for a specific chunk.
///
/// Produces the same sequence for the same `(world_seed, chunk)` pair,
/// regardless of the order in which chunks are generated.
pub fn chunk_rng(world_seed: u64, chunk: TileCoord) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_chunk_seed(world_seed, chunk))
}
