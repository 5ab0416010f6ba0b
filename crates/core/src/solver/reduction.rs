//! Lock-free grid-wide maximum.
//!
//! Non-negative IEEE-754 floats order the same way as their bit patterns read
//! as unsigned integers, so `AtomicU32::fetch_max` on the bits is an exact,
//! associative and commutative max. The result does not depend on which
//! worker thread combines first.

use std::sync::atomic::{AtomicU32, Ordering};

/// Order-independent running maximum of non-negative `f32` values.
#[derive(Debug, Default)]
pub struct GlobalMaxAccumulator {
    bits: AtomicU32,
}

impl GlobalMaxAccumulator {
    /// New accumulator holding 0.0
    #[must_use]
    pub fn new() -> Self {
        Self {
            bits: AtomicU32::new(0.0_f32.to_bits()),
        }
    }

    /// Fold `value` into the maximum.
    ///
    /// Zero, negative (including `-0.0`) and NaN values cannot raise the
    /// maximum above its 0.0 floor and are skipped.
    #[inline]
    pub fn combine(&self, value: f32) {
        if value > 0.0 {
            self.bits.fetch_max(value.to_bits(), Ordering::Relaxed);
        }
    }

    /// Current maximum
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Reset to 0.0 before a new batch
    pub fn reset(&self) {
        self.bits.store(0.0_f32.to_bits(), Ordering::Relaxed);
    }
}
