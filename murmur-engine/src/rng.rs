//! Random source for the generators.
//!
//! A plain LCG keeps generation deterministic under a seed and keeps the
//! scheduler free of heavyweight RNG state; tests script the seam directly.

/// Source of uniform randomness for scheduling and phrase generation.
///
/// Object-safe so generators can hold `Box<dyn RandomSource>`. All range
/// helpers are half-open: `[lo, hi)`.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    /// Uniform integer in `[lo, hi)`. Returns `lo` when the range is empty.
    fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        lo + self.next_u32() % (hi - lo)
    }

    /// Uniform float in `[lo, hi)`. Returns `lo` when the range is empty.
    fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        let unit = self.next_u32() as f64 / (u32::MAX as f64 + 1.0);
        lo + unit * (hi - lo)
    }

    /// Uniform index into a slice of `len` items. `len` must be non-zero;
    /// a zero length yields 0.
    fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "pick_index on empty collection");
        if len == 0 {
            return 0;
        }
        (self.next_u32() as usize) % len
    }
}

/// 64-bit linear congruential generator, high 31 bits taken per draw.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl RandomSource for Lcg {
    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1);
        (self.state >> 33) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lcg_is_deterministic_under_seed() {
        let mut a = Lcg::new(12345);
        let mut b = Lcg::new(12345);
        for _ in 0..64 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn range_u32_stays_in_bounds() {
        let mut rng = Lcg::new(7);
        for _ in 0..1000 {
            let v = rng.range_u32(3, 8);
            assert!((3..8).contains(&v));
        }
    }

    #[test]
    fn range_f64_is_half_open() {
        let mut rng = Lcg::new(99);
        for _ in 0..1000 {
            let v = rng.range_f64(10.0, 15.0);
            assert!((10.0..15.0).contains(&v));
        }
    }

    #[test]
    fn empty_ranges_collapse_to_lo() {
        let mut rng = Lcg::new(1);
        assert_eq!(rng.range_u32(5, 5), 5);
        assert_eq!(rng.range_f64(2.0, 1.0), 2.0);
    }
}
