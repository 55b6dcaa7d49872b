//! Biome classification from two coherent noise fields
//!
//! A coordinate is snapped to the center of its tile, then a "temperature" and
//! a "moisture" sample are taken at independently offset positions scaled by
//! the biome size. The signs of the two samples pick one of four quadrant
//! biomes. Without noise fields (the boss arena) every coordinate is
//! [`Biome::SpecialArena`].

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Biome categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Fire,
    Water,
    Soil,
    Air,
    /// Fallback when no noise fields exist
    SpecialArena,
}

impl Biome {
    /// Quadrant rule; a sample of exactly `0.0` counts as "not positive"
    pub fn from_climate(temperature: f32, moisture: f32) -> Self {
        match (temperature > 0.0, moisture > 0.0) {
            (true, true) => Biome::Air,
            (true, false) => Biome::Fire,
            (false, true) => Biome::Water,
            (false, false) => Biome::Soil,
        }
    }

    pub fn is_water(self) -> bool {
        self == Biome::Water
    }
}

/// Build an OpenSimplex2 field with no fractal layering and unit frequency
///
/// Callers pre-scale coordinates by the biome size.
fn climate_noise(seed: i32) -> FastNoiseLite {
    let mut noise = FastNoiseLite::with_seed(seed);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_fractal_type(Some(FractalType::None));
    noise.set_frequency(Some(1.0));
    noise
}

/// The two seeded noise fields of a world
pub struct ClimateNoise {
    temperature_seed: i32,
    moisture_seed: i32,
    temperature: FastNoiseLite,
    moisture: FastNoiseLite,
}

impl ClimateNoise {
    pub fn new(temperature_seed: i32, moisture_seed: i32) -> Self {
        Self {
            temperature_seed,
            moisture_seed,
            temperature: climate_noise(temperature_seed),
            moisture: climate_noise(moisture_seed),
        }
    }

    pub fn seeds(&self) -> (i32, i32) {
        (self.temperature_seed, self.moisture_seed)
    }
}

/// Pure coordinate → biome mapping
pub struct BiomeClassifier {
    noise: Option<ClimateNoise>,
    tile_size: f32,
    biome_size: f32,
    /// Temperature x/y offsets, then moisture x/y offsets
    offsets: [f32; 4],
}

impl BiomeClassifier {
    pub fn new(noise: ClimateNoise, tile_size: f32, biome_size: f32, offsets: [f32; 4]) -> Self {
        Self {
            noise: Some(noise),
            tile_size: tile_size.max(1.0),
            biome_size: if biome_size > 0.0 { biome_size } else { 1.0 },
            offsets,
        }
    }

    /// Classifier without noise fields: everything is [`Biome::SpecialArena`]
    pub fn arena(tile_size: f32) -> Self {
        Self {
            noise: None,
            tile_size: tile_size.max(1.0),
            biome_size: 1.0,
            offsets: [0.0; 4],
        }
    }

    pub fn has_noise(&self) -> bool {
        self.noise.is_some()
    }

    pub fn offsets(&self) -> [f32; 4] {
        self.offsets
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Center of the tile containing `coord`
    pub fn tile_center(&self, coord: f32) -> f32 {
        (coord / self.tile_size).floor() * self.tile_size + self.tile_size / 2.0
    }

    /// Raw `(temperature, moisture)` samples at the tile containing `(x, y)`
    pub fn climate(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        let noise = self.noise.as_ref()?;
        let cx = self.tile_center(x);
        let cy = self.tile_center(y);
        let [tx, ty, mx, my] = self.offsets;

        let temperature = noise
            .temperature
            .get_noise_2d((cx + tx) / self.biome_size, (cy + ty) / self.biome_size);
        let moisture = noise
            .moisture
            .get_noise_2d((cx + mx) / self.biome_size, (cy + my) / self.biome_size);
        Some((temperature, moisture))
    }

    pub fn classify(&self, x: f32, y: f32) -> Biome {
        match self.climate(x, y) {
            Some((temperature, moisture)) => Biome::from_climate(temperature, moisture),
            None => Biome::SpecialArena,
        }
    }

    pub fn classify_at(&self, pos: Vec2) -> Biome {
        self.classify(pos.x, pos.y)
    }
}

impl std::fmt::Debug for BiomeClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BiomeClassifier")
            .field("noise_seeds", &self.noise.as_ref().map(ClimateNoise::seeds))
            .field("tile_size", &self.tile_size)
            .field("biome_size", &self.biome_size)
            .field("offsets", &self.offsets)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> BiomeClassifier {
        BiomeClassifier::new(
            ClimateNoise::new(1234, -777),
            128.0,
            512.0,
            [100.0, -250.0, 3000.0, 42.0],
        )
    }

    #[test]
    fn test_quadrant_rule() {
        assert_eq!(Biome::from_climate(0.5, 0.5), Biome::Air);
        assert_eq!(Biome::from_climate(0.5, -0.5), Biome::Fire);
        assert_eq!(Biome::from_climate(-0.5, 0.5), Biome::Water);
        assert_eq!(Biome::from_climate(-0.5, -0.5), Biome::Soil);
    }

    #[test]
    fn test_zero_counts_as_not_positive() {
        assert_eq!(Biome::from_climate(0.0, 0.0), Biome::Soil);
        assert_eq!(Biome::from_climate(0.0, 0.3), Biome::Water);
        assert_eq!(Biome::from_climate(0.3, 0.0), Biome::Fire);
    }

    #[test]
    fn test_arena_is_always_special() {
        let arena = BiomeClassifier::arena(128.0);
        assert!(!arena.has_noise());
        for (x, y) in [(0.0, 0.0), (-5000.0, 123.0), (1e7, -1e7)] {
            assert_eq!(arena.classify(x, y), Biome::SpecialArena);
        }
    }

    #[test]
    fn test_classify_is_deterministic() {
        let a = classifier();
        let b = classifier();
        for i in -50..50 {
            let x = i as f32 * 97.3;
            let y = i as f32 * -61.7;
            assert_eq!(a.classify(x, y), a.classify(x, y));
            assert_eq!(a.classify(x, y), b.classify(x, y));
        }
    }

    #[test]
    fn test_constant_within_tile() {
        let c = classifier();
        for tile_x in -8..8 {
            for tile_y in -8..8 {
                let base_x = tile_x as f32 * 128.0;
                let base_y = tile_y as f32 * 128.0;
                let expected = c.classify(base_x, base_y);
                for (dx, dy) in [(0.5, 0.5), (64.0, 3.0), (127.9, 127.9), (10.0, 120.0)] {
                    assert_eq!(c.classify(base_x + dx, base_y + dy), expected);
                }
            }
        }
    }

    #[test]
    fn test_tile_center_snapping() {
        let c = classifier();
        assert_eq!(c.tile_center(0.0), 64.0);
        assert_eq!(c.tile_center(127.0), 64.0);
        assert_eq!(c.tile_center(128.0), 192.0);
        assert_eq!(c.tile_center(-1.0), -64.0);
    }

    #[test]
    fn test_small_biomes_produce_variety() {
        let c = classifier();
        let mut seen = std::collections::HashSet::new();
        for i in -40..40 {
            for j in -40..40 {
                seen.insert(c.classify(i as f32 * 256.0, j as f32 * 256.0));
            }
        }
        assert_eq!(seen.len(), 4, "expected all four quadrant biomes, got {seen:?}");
    }
}
