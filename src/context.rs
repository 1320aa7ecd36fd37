//! Generation context (C2): the per-call bundle of RNG and metadata carried
//! by value into every algorithmic routine, per §4.1.

use crate::cancel::CancellationToken;
use crate::rng::Rng;

/// What kind of content a generation call is producing. Purely descriptive
/// metadata, used for logging and for routines that branch on content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Terrain,
    Level,
}

/// Bundle of RNG and metadata carried through a single generation.
///
/// No routine in this crate may reach for ambient/global randomness —
/// everything flows through a `GenContext` passed by value or `&mut`
/// reference, per the concurrency model in §5.
pub struct GenContext {
    rng: Rng,
    content_type: ContentType,
    operation: &'static str,
    seed: u64,
    cancel: CancellationToken,
}

impl GenContext {
    pub fn new(rng: Rng, content_type: ContentType, operation: &'static str, seed: u64) -> Self {
        Self {
            rng,
            content_type,
            operation,
            seed,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[inline]
    pub fn rng(&mut self) -> &mut Rng {
        &mut self.rng
    }

    #[inline]
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    #[inline]
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// `[0, 1)` float draw.
    #[inline]
    pub fn random_float(&mut self) -> f64 {
        self.rng.random()
    }

    /// Inclusive `[lo, hi]` integer draw.
    #[inline]
    pub fn random_int_range(&mut self, lo: i32, hi: i32) -> i32 {
        self.rng.int_inclusive(lo, hi)
    }

    /// Check the cancellation token, returning an error if it has fired.
    /// Callers must invoke this between CA iterations, between pipeline
    /// stages, and between room generations (§5 "Suspension points").
    pub fn check_cancelled(&self) -> crate::error::Result<()> {
        if self.cancel.is_cancelled() {
            Err(crate::error::Error::Cancelled)
        } else {
            Ok(())
        }
    }
}
