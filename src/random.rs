//! Injected random sources.
//!
//! Every random decision in the simulation goes through [`RandomSource`], so a
//! session is fully reproducible from its seed. Draw order is part of the
//! contract: generation takes five draws per interior cell in row-major order,
//! an enemy collision takes one, and spawning takes `(row, column)` pairs.

/// A source of uniformly distributed integers.
pub trait RandomSource {
    /// Draw a value in `[0, bound)`. A `bound` of zero yields zero.
    fn below(&mut self, bound: u32) -> u32;

    /// Draw a value in `[low, high]`.
    fn between(&mut self, low: u32, high: u32) -> u32 {
        low + self.below(high.saturating_sub(low) + 1)
    }

    /// Returns `true` with probability `1 / n`.
    fn one_in(&mut self, n: u32) -> bool {
        self.below(n) == 0
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn below(&mut self, bound: u32) -> u32 {
        (**self).below(bound)
    }
}

/// Deterministic PRNG using xorshift64.
#[derive(Debug, Clone, Copy)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Create a new generator with the given seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        // Zero is a fixed point of xorshift
        let state = if seed == 0 { 0x5555_5555_5555_5555 } else { seed };
        Self { state }
    }

    /// Generate the next raw value.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl RandomSource for Xorshift64 {
    #[allow(clippy::cast_possible_truncation)]
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        (self.next_u64() % u64::from(bound)) as u32
    }
}

/// Replays a fixed list of draws, for reproducing exact traces in tests.
///
/// Each scripted value is reduced modulo the requested bound. Once the script
/// runs out every draw returns zero.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    draws: Vec<u32>,
    cursor: usize,
}

impl ScriptedSource {
    /// Create a source that yields `draws` in order.
    #[must_use]
    pub fn new(draws: Vec<u32>) -> Self {
        Self { draws, cursor: 0 }
    }

    /// Number of draws consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn below(&mut self, bound: u32) -> u32 {
        let value = self.draws.get(self.cursor).copied().unwrap_or(0);
        self.cursor += 1;
        if bound == 0 { 0 } else { value % bound }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xorshift_determinism() {
        let mut rng1 = Xorshift64::new(12345);
        let mut rng2 = Xorshift64::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_xorshift_different_seeds() {
        let mut rng1 = Xorshift64::new(12345);
        let mut rng2 = Xorshift64::new(54321);
        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_zero_seed_not_degenerate() {
        let mut rng = Xorshift64::new(0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn test_between_is_inclusive() {
        let mut rng = Xorshift64::new(7);
        let mut seen = [false; 5];
        for _ in 0..1000 {
            let v = rng.between(20, 24);
            assert!((20..=24).contains(&v));
            seen[(v - 20) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "every value in 20..=24 should appear");
    }

    #[test]
    fn test_below_zero_bound() {
        let mut rng = Xorshift64::new(1);
        assert_eq!(rng.below(0), 0);
    }

    #[test]
    fn test_scripted_source() {
        let mut rng = ScriptedSource::new(vec![2, 7, 4]);
        assert_eq!(rng.between(20, 24), 22);
        assert_eq!(rng.below(5), 2);
        assert!(!rng.one_in(4));
        assert_eq!(rng.consumed(), 3);
        // Exhausted
        assert_eq!(rng.below(10), 0);
    }

    #[test]
    fn test_mut_ref_forwarding() {
        fn draw<R: RandomSource>(mut rng: R) -> u32 {
            rng.below(10)
        }

        let mut inner = ScriptedSource::new(vec![3]);
        assert_eq!(draw(&mut inner), 3);
        assert_eq!(inner.consumed(), 1);
    }
}
