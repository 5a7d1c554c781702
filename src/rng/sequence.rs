//! Seeded random sequence keyed by a string
//!
//! Every piece of procedural content is drawn from a sequence whose key is
//! the world seed (optionally concatenated with a chunk identity), so the
//! same key always yields the same draws regardless of visit order.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// FNV-1a 64-bit fold of a byte string.
///
/// Written out here rather than using `DefaultHasher` because the key-to-seed
/// mapping must be stable across Rust releases and processes.
fn fnv1a_64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET_BASIS;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// Deterministic pseudo-random sequence derived from a string key.
///
/// Two sequences created from the same key produce identical draws. All draws
/// are pure functions of the key and call count.
#[derive(Debug, Clone)]
pub struct SeededSequence {
    rng: ChaCha8Rng,
}

impl SeededSequence {
    /// Create a sequence from an arbitrary string key
    pub fn from_key(key: &str) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(fnv1a_64(key.as_bytes())),
        }
    }

    /// Next float in [0, 1)
    pub fn next(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Next float in [min, max)
    pub fn next_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next() * (max - min)
    }

    /// Next integer in [min, max] (inclusive)
    pub fn next_int(&mut self, min: u32, max: u32) -> u32 {
        debug_assert!(min <= max);
        min + (self.next() * (max - min + 1) as f32) as u32
    }

    /// Bernoulli draw with the given probability of true
    pub fn next_bool(&mut self, probability: f32) -> bool {
        self.next() < probability
    }

    /// Uniform pick from a non-empty slice
    pub fn pick<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            return None;
        }
        let idx = (self.next() * slice.len() as f32) as usize;
        slice.get(idx.min(slice.len() - 1))
    }
}
