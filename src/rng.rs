//! Seeded random number generator for deterministic generation.
//!
//! All randomness in the pipeline must flow through this wrapper (or the
//! [`crate::context::GenContext`] that carries it) — no global RNG is ever
//! consulted, per §5's concurrency model.

use rand::{Rng as RandRng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded RNG wrapper for deterministic generation.
pub struct Rng {
    inner: ChaCha8Rng,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Exclusive-upper integer range `[min, max)`.
    pub fn range(&mut self, min: i32, max: i32) -> i32 {
        self.inner.gen_range(min..max)
    }

    /// Exclusive-upper `usize` range `[min, max)`.
    pub fn range_usize(&mut self, min: usize, max: usize) -> usize {
        self.inner.gen_range(min..max)
    }

    /// Inclusive integer range `[lo, hi]`, matching the spec's
    /// `RandomIntRange(lo, hi)` contract (§4.1).
    pub fn int_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if lo >= hi {
            return lo;
        }
        self.inner.gen_range(lo..=hi)
    }

    /// `[0, 1)` float, matching the spec's `RandomFloat()` contract.
    pub fn random(&mut self) -> f64 {
        self.inner.gen()
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.gen()
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.random() < probability
    }

    pub fn pick<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            None
        } else {
            Some(&slice[self.range_usize(0, slice.len())])
        }
    }

    /// Weighted pick over `(item, weight)` pairs. Weights need not sum to 1.
    pub fn weighted_pick<'a, T>(&mut self, items: &'a [(T, f64)]) -> Option<&'a T> {
        let total: f64 = items.iter().map(|(_, w)| w).sum();
        if items.is_empty() || total <= 0.0 {
            return None;
        }
        let mut roll = self.random() * total;
        for (item, weight) in items {
            if roll < *weight {
                return Some(item);
            }
            roll -= weight;
        }
        items.last().map(|(item, _)| item)
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.range_usize(0, i + 1);
            slice.swap(i, j);
        }
    }
}
