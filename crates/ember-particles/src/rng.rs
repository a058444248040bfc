//! Seedable random source shared by emitter shapes and state managers

use ember_core::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic PRNG. ChaCha8 keeps sequences identical across platforms,
/// so a seed fully reproduces a simulation.
#[derive(Clone, Debug)]
pub struct ParticleRng {
    inner: ChaCha8Rng,
}

impl ParticleRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Returns a float in [min, max]. A degenerate range returns `min`.
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.inner.gen_range(min..=max)
    }

    /// Fair coin flip
    pub fn coin_flip(&mut self) -> bool {
        self.inner.gen_bool(0.5)
    }

    /// Returns a uniformly distributed unit vector
    pub fn unit_vector(&mut self) -> Vec2 {
        let angle = self.inner.gen_range(0.0..std::f32::consts::TAU);
        Vec2::from_angle(angle)
    }
}

impl Default for ParticleRng {
    fn default() -> Self {
        Self::new(0xDEAD_BEEF)
    }
}
