//! Seeded RNG for scenario setup.
//!
//! Nothing in the movement pipeline draws random numbers; ticks are fully
//! deterministic given the same requests.  `SimRng` is for building worlds
//! (obstacle scatter, spawn layouts) and for seeded property tests.

use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T: SampleUniform, R: SampleRange<T>>(&mut self, range: R) -> T {
        self.0.gen_range(range)
    }

    /// `true` with probability `p`; out-of-range `p` is clamped.
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
