//! Deterministic PRNG handed to every action through its context.
//!
//! Uses the SplitMix64 algorithm: 8 bytes of state and trivially
//! serializable. Seeded by the ledger so that every node replaying a block
//! draws the same sequence.

/// SplitMix64 pseudo-random number generator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActionRng {
    state: u64,
}

impl ActionRng {
    /// Start a sequence from `seed`.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Advance the state and return the next output.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform value in `0..bound`. Returns 0 when `bound` is 0.
    pub fn next_below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        // Multiply-shift range reduction.
        ((self.next_u64() as u128 * bound as u128) >> 64) as u64
    }

    /// Current internal state, for checkpointing.
    pub fn state(&self) -> u64 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let mut a = ActionRng::new(42);
        let mut b = ActionRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = ActionRng::new(1);
        let mut b = ActionRng::new(2);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn next_below_stays_in_range() {
        let mut rng = ActionRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_below(6) < 6);
        }
        assert_eq!(rng.next_below(0), 0);
    }

    #[test]
    fn serialization_round_trip() {
        let mut rng = ActionRng::new(42);
        for _ in 0..50 {
            rng.next_u64();
        }

        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: ActionRng = serde_json::from_str(&json).unwrap();
        assert_eq!(rng, restored);
        for _ in 0..10 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }
}
