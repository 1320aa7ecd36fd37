//! Seed manager (C1): derives independent, reproducible RNG streams from a
//! single root seed, per §4.1.

use crate::rng::Rng;

/// Derives per-subsystem RNG streams from a root seed.
///
/// `derive_stream` mixes `(root, tag)` through a fixed SplitMix64-style
/// function before seeding a [`Rng`]. The mixing function is a contract:
/// changing it breaks cross-run/cross-implementation reproducibility (I6),
/// so it must never be tuned.
pub struct SeedManager {
    root: u64,
}

impl SeedManager {
    pub fn new(root: u64) -> Self {
        log::debug!("seed manager created root={root}");
        Self { root }
    }

    pub fn root(&self) -> u64 {
        self.root
    }

    /// Derive an independent RNG stream tagged by `tag`.
    ///
    /// Two calls with the same `(root, tag)` always produce the same
    /// stream; two calls with different tags under the same root produce
    /// streams that do not influence each other's output sequence (P2).
    pub fn derive_stream(&self, tag: &str) -> Rng {
        let seed = mix(self.root, tag);
        log::debug!("derived stream tag={tag} seed={seed}");
        Rng::new(seed)
    }
}

/// SplitMix64-style 64-bit mixing of `(root, tag)`.
///
/// The tag is first folded into a 64-bit value with FNV-1a (cheap, stable,
/// no external dependency), then combined with `root` and run through the
/// SplitMix64 finalizer so that small changes to either input diffuse across
/// the whole output.
fn mix(root: u64, tag: &str) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;
    let mut tag_hash = FNV_OFFSET;
    for byte in tag.as_bytes() {
        tag_hash ^= u64::from(*byte);
        tag_hash = tag_hash.wrapping_mul(FNV_PRIME);
    }

    let mut z = root.wrapping_add(tag_hash).wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_root_and_tag_is_deterministic() {
        let m1 = SeedManager::new(12345);
        let m2 = SeedManager::new(12345);
        let mut r1 = m1.derive_stream("terrain.cellular");
        let mut r2 = m2.derive_stream("terrain.cellular");
        for _ in 0..100 {
            assert_eq!(r1.next_u64(), r2.next_u64());
        }
    }

    #[test]
    fn different_tags_diverge() {
        let m = SeedManager::new(999);
        let mut a = m.derive_stream("terrain.cellular");
        let mut b = m.derive_stream("corridor.planner");
        // Overwhelmingly likely to differ in the first draw.
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn stream_independence_p2() {
        // Changing a "config" that only affects how many times a stream is
        // pulled elsewhere must not change this stream's sequence, because
        // streams are derived independently from the root — this is the
        // crux of P2 and is guaranteed structurally by `derive_stream`
        // taking only `(root, tag)`, never external state.
        let m = SeedManager::new(42);
        let mut corridor_a = m.derive_stream("corridor.planner");
        let seq_a: Vec<u64> = (0..10).map(|_| corridor_a.next_u64()).collect();

        let m2 = SeedManager::new(42);
        // Pretend some other stream got pulled from many more times first.
        let mut other = m2.derive_stream("terrain.cellular");
        for _ in 0..500 {
            other.next_u64();
        }
        let mut corridor_b = m2.derive_stream("corridor.planner");
        let seq_b: Vec<u64> = (0..10).map(|_| corridor_b.next_u64()).collect();

        assert_eq!(seq_a, seq_b);
    }
}
