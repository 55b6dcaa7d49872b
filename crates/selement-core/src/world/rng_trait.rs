//! RNG trait abstraction for the runtime simulation
//!
//! Mob spawning, boss pattern selection and particle scattering all draw from
//! a `WorldRng`. The world owns a seeded `Xoshiro256StarStar`; tests can hand in
//! their own seeded stream to replay a run exactly.

/// Random number generator trait for world simulation
pub trait WorldRng {
    /// Generate random f32 in [0.0, 1.0)
    fn gen_f32(&mut self) -> f32;

    /// Uniform f32 in [min, max)
    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + self.gen_f32() * (max - min)
    }

    /// Uniform integer in [min, max] (inclusive); `min` when the range is empty
    fn range_i32(&mut self, min: i32, max: i32) -> i32;

    /// Either `1.0` or `-1.0` with equal probability
    fn sign(&mut self) -> f32 {
        if self.gen_f32() < 0.5 { -1.0 } else { 1.0 }
    }

    /// Check if random value is less than probability threshold
    fn check_probability(&mut self, probability: f32) -> bool {
        self.gen_f32() < probability
    }

    /// Pick an index in [0, len); 0 for an empty or single-element slice
    fn pick_index(&mut self, len: usize) -> usize;
}

// Blanket implementation for any type implementing rand::Rng
impl<T: ?Sized + rand::Rng> WorldRng for T {
    fn gen_f32(&mut self) -> f32 {
        rand::Rng::gen(self)
    }

    fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        rand::Rng::gen_range(self, min..=max)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        rand::Rng::gen_range(self, 0..len)
    }
}
