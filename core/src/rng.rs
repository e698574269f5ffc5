//! Deterministic random number generation.
//!
//! RULE: Nothing in the pipeline may call any platform RNG.
//! All randomness flows through StageRng instances derived from the
//! single master seed resolved at engine start.
//!
//! Each pipeline stage gets its own stream, seeded deterministically
//! from (master_seed XOR stage_slot). This means:
//!   - Adding a new stage never changes existing stages' streams.
//!   - Each stage's draw sequence is fully reproducible in isolation.
//!   - (seed, slot) → outcome is the documented reproducibility contract.

use crate::error::{SynthError, SynthResult};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for a single pipeline stage.
pub struct StageRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl StageRng {
    /// Create a stage RNG from the master seed and a stable stage slot.
    /// The slot number must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll an integer in [min, max], inclusive of both ends.
    pub fn int_range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min <= max, "int_range: min {min} > max {max}");
        let span = (max - min) as u64 + 1;
        min + self.next_u64_below(span) as i64
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform selection from a slice.
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> SynthResult<&'a T> {
        if items.is_empty() {
            return Err(SynthError::InvalidArgument {
                reason: "choice on empty sequence".into(),
            });
        }
        let index = self.next_u64_below(items.len() as u64) as usize;
        Ok(&items[index])
    }

    /// Weighted selection: probability proportional to weight.
    ///
    /// Cumulative-subtraction scan — the first item whose cumulative
    /// weight crosses the drawn point wins.
    pub fn weighted_choice<'a, T>(
        &mut self,
        items: &'a [T],
        weights: &[f64],
    ) -> SynthResult<&'a T> {
        if items.is_empty() {
            return Err(SynthError::InvalidArgument {
                reason: "weighted_choice on empty sequence".into(),
            });
        }
        if items.len() != weights.len() {
            return Err(SynthError::InvalidArgument {
                reason: format!(
                    "weighted_choice: {} items vs {} weights",
                    items.len(),
                    weights.len()
                ),
            });
        }
        let total: f64 = weights.iter().sum();
        if !(total > 0.0) {
            return Err(SynthError::InvalidArgument {
                reason: format!("weighted_choice: non-positive weight sum {total}"),
            });
        }
        let mut point = self.next_f64() * total;
        for (item, weight) in items.iter().zip(weights.iter()) {
            point -= weight;
            if point < 0.0 {
                return Ok(item);
            }
        }
        Ok(items.last().expect("non-empty checked above"))
    }
}

/// All stage RNGs for a single run, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_stage(&self, slot: StageSlot) -> StageRng {
        StageRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stage slot assignments.
/// NEVER reorder or remove entries — only append.
/// Reordering changes every stage's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StageSlot {
    Population = 0,
    Events = 1,
    Correction = 2,
    // Add new stages here — append only.
}

impl StageSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Population => "population",
            Self::Events => "events",
            Self::Correction => "correction",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = RngBank::new(42).for_stage(StageSlot::Events);
        let mut b = RngBank::new(42).for_stage(StageSlot::Events);
        for _ in 0..1000 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn stages_draw_from_independent_streams() {
        let bank = RngBank::new(42);
        let mut pop = bank.for_stage(StageSlot::Population);
        let mut evt = bank.for_stage(StageSlot::Events);
        let diverged = (0..16).any(|_| pop.next_f64() != evt.next_f64());
        assert!(diverged, "stage streams should not be identical");
    }

    #[test]
    fn int_range_is_inclusive_of_both_ends() {
        let mut rng = RngBank::new(7).for_stage(StageSlot::Events);
        let mut saw_min = false;
        let mut saw_max = false;
        for _ in 0..10_000 {
            let v = rng.int_range(3, 5);
            assert!((3..=5).contains(&v), "out of range: {v}");
            saw_min |= v == 3;
            saw_max |= v == 5;
        }
        assert!(saw_min && saw_max, "both ends must be reachable");
    }

    #[test]
    fn next_f64_stays_in_unit_interval() {
        let mut rng = RngBank::new(1234).for_stage(StageSlot::Population);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "out of [0,1): {v}");
        }
    }

    #[test]
    fn choice_rejects_empty_sequence() {
        let mut rng = RngBank::new(1).for_stage(StageSlot::Events);
        let empty: [u32; 0] = [];
        assert!(matches!(
            rng.choice(&empty),
            Err(SynthError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn weighted_choice_rejects_bad_input() {
        let mut rng = RngBank::new(1).for_stage(StageSlot::Events);
        let empty: [u32; 0] = [];
        assert!(rng.weighted_choice(&empty, &[]).is_err());
        assert!(rng.weighted_choice(&[1, 2], &[0.5]).is_err());
        assert!(rng.weighted_choice(&[1, 2], &[0.0, 0.0]).is_err());
        assert!(rng.weighted_choice(&[1, 2], &[-1.0, 1.0]).is_err());
    }

    #[test]
    fn weighted_choice_respects_weights() {
        let mut rng = RngBank::new(99).for_stage(StageSlot::Events);
        let items = ["rare", "common"];
        let weights = [0.05, 0.95];
        let mut common = 0usize;
        const N: usize = 20_000;
        for _ in 0..N {
            if *rng.weighted_choice(&items, &weights).unwrap() == "common" {
                common += 1;
            }
        }
        let share = common as f64 / N as f64;
        assert!(
            (share - 0.95).abs() < 0.02,
            "common share {share} too far from 0.95"
        );
    }

    #[test]
    fn zero_weight_item_is_never_picked() {
        let mut rng = RngBank::new(5).for_stage(StageSlot::Events);
        let items = ["never", "always"];
        for _ in 0..5_000 {
            let picked = rng.weighted_choice(&items, &[0.0, 1.0]).unwrap();
            assert_eq!(*picked, "always");
        }
    }
}
