//! xorshift64* generator behind every random draw in the engine
//!
//! Shift-xor the 64-bit state three times, then multiply by a fixed odd
//! constant to scramble the low bits. Cheap, and good enough for arrival
//! sampling.
//!
//! Replay rests on it: the orchestrator owns the only instance, so a seed
//! plus a command sequence fully determines a run.

use serde::{Deserialize, Serialize};

/// Seeded xorshift64* stream
///
/// # Example
/// ```
/// use elevator_dispatch_core::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let u = rng.next_f64();
/// let floor = rng.next_int(0, 19); // [0, 19]
/// assert!((0.0..1.0).contains(&u));
/// assert!((0..=19).contains(&floor));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit, never zero)
    state: u64,
}

impl RngManager {
    /// Seed a fresh stream
    ///
    /// A zero seed is mapped to 1 (xorshift cannot leave the all-zero state).
    pub fn new(seed: u64) -> Self {
        Self {
            state: Self::seed_to_state(seed),
        }
    }

    fn seed_to_state(seed: u64) -> u64 {
        if seed == 0 {
            1
        } else {
            seed
        }
    }

    /// Re-seed in place, restarting the stream.
    pub fn reset(&mut self, seed: u64) {
        self.state = Self::seed_to_state(seed);
    }

    /// Advance the stream by one 64-bit word
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Uniform draw in [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        // Top 53 bits → [0.0, 1.0)
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Generate random integer in range [min, max] (both inclusive)
    ///
    /// # Panics
    /// Panics if min > max
    ///
    /// # Example
    /// ```
    /// use elevator_dispatch_core::RngManager;
    ///
    /// let mut rng = RngManager::new(7);
    /// assert_eq!(rng.next_int(3, 3), 3);
    /// ```
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        assert!(min <= max, "min must not exceed max");

        let span = (max - min) as u64 + 1;
        min + (self.next() % span) as i64
    }

    /// Sample a Poisson-distributed count with mean `lambda`
    ///
    /// Knuth's product method: multiply uniform draws until the running
    /// product falls to `e^-lambda` or below, counting draws. Returns 0
    /// for `lambda <= 0` (or non-finite lambda) without consuming the stream.
    ///
    /// # Example
    /// ```
    /// use elevator_dispatch_core::RngManager;
    ///
    /// let mut rng = RngManager::new(42);
    /// let before = rng.get_state();
    /// assert_eq!(rng.poisson(0.0), 0);
    /// assert_eq!(rng.get_state(), before);
    /// ```
    pub fn poisson(&mut self, lambda: f64) -> u64 {
        if !lambda.is_finite() || lambda <= 0.0 {
            return 0;
        }

        let limit = (-lambda).exp();
        let mut k: u64 = 0;
        let mut product = 1.0;
        loop {
            k += 1;
            product *= self.next_f64();
            if product <= limit {
                break;
            }
        }
        k - 1
    }

    /// Get current RNG state (for replay diagnostics)
    pub fn get_state(&self) -> u64 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = RngManager::new(0);
        assert_ne!(rng.get_state(), 0, "Zero seed should be converted to 1");
    }

    #[test]
    #[should_panic(expected = "min must not exceed max")]
    fn test_next_int_invalid_bounds() {
        let mut rng = RngManager::new(12345);
        rng.next_int(100, 50);
    }

    #[test]
    fn test_next_f64_in_range() {
        let mut rng = RngManager::new(12345);

        for _ in 0..1000 {
            let val = rng.next_f64();
            assert!(
                (0.0..1.0).contains(&val),
                "next_f64() produced value {} outside [0.0, 1.0)",
                val
            );
        }
    }

    #[test]
    fn test_next_int_is_inclusive() {
        let mut rng = RngManager::new(2024);
        let mut seen_min = false;
        let mut seen_max = false;

        for _ in 0..2000 {
            let v = rng.next_int(0, 3);
            assert!((0..=3).contains(&v));
            seen_min |= v == 0;
            seen_max |= v == 3;
        }

        assert!(seen_min && seen_max, "both bounds should be reachable");
    }

    #[test]
    fn test_reset_restarts_stream() {
        let mut rng = RngManager::new(99);
        let first: Vec<u64> = (0..5).map(|_| rng.next()).collect();

        rng.reset(99);
        let second: Vec<u64> = (0..5).map(|_| rng.next()).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_poisson_negative_lambda_is_zero() {
        let mut rng = RngManager::new(5);
        assert_eq!(rng.poisson(-3.0), 0);
        assert_eq!(rng.poisson(f64::NAN), 0);
    }
}
