//! Simulation tuning loaded from RON
//!
//! Every section has a `Default` equal to the built-in game constants, so a
//! partial file only overrides what it names. Nonsensical values are clamped
//! by [`SimConfig::validated`] rather than rejected.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Largest distance from the origin where `f32` positions keep 1/8 px steps
pub const PRECISE_COORDINATE_LIMIT: f32 = 1_048_576.0;

/// Top-level simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SimConfig {
    #[serde(default)]
    pub world: WorldConfig,

    #[serde(default)]
    pub spawning: SpawningConfig,

    #[serde(default)]
    pub decoration: DecorationConfig,

    #[serde(default)]
    pub player: PlayerConfig,
}

/// World geometry and cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Edge length of a chunk in world pixels
    pub chunk_size: i32,
    /// Edge length of a background tile in world pixels
    pub tile_size: i32,
    /// Side of the square ring of loaded chunks (forced odd)
    pub load_chunk_size: u32,
    /// Characteristic scale of the biome noise fields
    pub biome_size: f32,
    /// Upper bound of the random noise offsets and the spawn point
    ///
    /// Clamped to [`PRECISE_COORDINATE_LIMIT`].
    pub offset_max: f32,
    /// Width and height of the playable area, centered on the origin
    ///
    /// Positions are `f32`: past [`PRECISE_COORDINATE_LIMIT`] from the origin
    /// movement steps get coarser than 1/8 px, past 2^24 coarser than 1 px.
    pub world_size: f32,
    /// Seconds between spawn/despawn ticks
    pub game_tick_interval: f32,
    /// Width and height of the boss arena
    pub room_size: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1024,
            tile_size: 128,
            load_chunk_size: 3,
            biome_size: 8192.0,
            offset_max: 8192.0,
            world_size: 1_000_000_000.0,
            game_tick_interval: 0.1,
            room_size: 4096,
        }
    }
}

/// Mob population control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawningConfig {
    pub max_mobs: usize,
    pub spawn_distance_min: f32,
    pub spawn_distance_max: f32,
    pub despawn_distance: f32,
}

impl Default for SpawningConfig {
    fn default() -> Self {
        Self {
            max_mobs: 15,
            spawn_distance_min: 3000.0,
            spawn_distance_max: 10000.0,
            despawn_distance: 20000.0,
        }
    }
}

/// Scatter probabilities for chunk decoration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationConfig {
    pub grass_attempts: u32,
    pub grass_chance: f32,
    /// Rounds of the tree / fire / coral scatter
    pub scatter_rounds: u32,
    pub tree_chance: f32,
    pub fire_chance: f32,
    pub coral_chance: f32,
    /// Share of fires that burn blue
    pub blue_fire_chance: f32,
    pub portal_chance: f32,
    /// Interaction radius of portals and pickups
    pub interact_radius: f32,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            grass_attempts: 128,
            grass_chance: 0.8,
            scatter_rounds: 32,
            tree_chance: 0.5,
            fire_chance: 0.7,
            coral_chance: 0.4,
            blue_fire_chance: 0.001,
            portal_chance: 0.01,
            interact_radius: 32.0,
        }
    }
}

/// Player movement and resource tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Ground speed in pixels/sec
    pub max_speed: f32,
    pub water_speed_factor: f32,
    pub air_speed_factor: f32,
    /// Inertia decay in the air biome
    pub air_drag: f32,
    pub max_hp: f32,
    pub element_max: u32,
    /// Seconds between element charges while charging
    pub element_charge_interval: f32,
    /// Player hit radius
    pub collider_radius: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_speed: 500.0,
            water_speed_factor: 0.5,
            air_speed_factor: 10.0,
            air_drag: 0.1,
            max_hp: 100.0,
            element_max: 100,
            element_charge_interval: 0.1,
            collider_radius: 32.0,
        }
    }
}

impl SimConfig {
    /// Parse a RON document; missing sections fall back to defaults
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Read and parse a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    /// Like [`Self::load`], but a missing file yields the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Clamp values the simulation cannot run with
    pub fn validated(mut self) -> Self {
        let world = &mut self.world;
        if world.chunk_size <= 0 {
            log::warn!("chunk_size {} is not positive, using 1024", world.chunk_size);
            world.chunk_size = 1024;
        }
        if world.tile_size <= 0 || world.tile_size > world.chunk_size {
            log::warn!(
                "tile_size {} does not fit the chunk, using {}",
                world.tile_size,
                world.chunk_size
            );
            world.tile_size = world.chunk_size;
        }
        if world.load_chunk_size % 2 == 0 {
            log::warn!(
                "load_chunk_size {} is even, using {}",
                world.load_chunk_size,
                world.load_chunk_size + 1
            );
            world.load_chunk_size += 1;
        }
        if world.biome_size <= 0.0 {
            log::warn!("biome_size {} is not positive, using 8192", world.biome_size);
            world.biome_size = 8192.0;
        }
        if world.offset_max < 1.0 {
            log::warn!("offset_max {} is below 1, using 1", world.offset_max);
            world.offset_max = 1.0;
        }
        if world.offset_max > PRECISE_COORDINATE_LIMIT {
            log::warn!(
                "offset_max {} would start the player where positions lose precision, using {}",
                world.offset_max,
                PRECISE_COORDINATE_LIMIT
            );
            world.offset_max = PRECISE_COORDINATE_LIMIT;
        }
        if world.world_size <= 0.0 {
            log::warn!("world_size {} is not positive, using default", world.world_size);
            world.world_size = WorldConfig::default().world_size;
        }
        if world.game_tick_interval <= 0.0 {
            log::warn!(
                "game_tick_interval {} is not positive, using 0.1",
                world.game_tick_interval
            );
            world.game_tick_interval = 0.1;
        }
        if world.room_size < world.tile_size {
            log::warn!("room_size {} is smaller than a tile, using 4096", world.room_size);
            world.room_size = 4096;
        }

        let spawning = &mut self.spawning;
        if spawning.spawn_distance_min > spawning.spawn_distance_max {
            log::warn!(
                "spawn band [{}, {}] is inverted, swapping",
                spawning.spawn_distance_min,
                spawning.spawn_distance_max
            );
            std::mem::swap(
                &mut spawning.spawn_distance_min,
                &mut spawning.spawn_distance_max,
            );
        }
        if spawning.despawn_distance < spawning.spawn_distance_max {
            log::warn!(
                "despawn_distance {} is inside the spawn band, using {}",
                spawning.despawn_distance,
                spawning.spawn_distance_max
            );
            spawning.despawn_distance = spawning.spawn_distance_max;
        }

        if self.player.element_charge_interval < 0.0 {
            log::warn!("element_charge_interval is negative, using 0");
            self.player.element_charge_interval = 0.0;
        }

        self
    }

    /// Chunk ring side, always odd
    pub fn ring_size(&self) -> i32 {
        let size = self.world.load_chunk_size.max(1) as i32;
        if size % 2 == 0 { size + 1 } else { size }
    }

    /// Tiles along one edge of a chunk
    pub fn tiles_per_chunk(&self) -> i32 {
        (self.world.chunk_size / self.world.tile_size.max(1)).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.world.chunk_size, 1024);
        assert_eq!(config.world.tile_size, 128);
        assert_eq!(config.spawning.max_mobs, 15);
        assert_eq!(config.decoration.grass_attempts, 128);
        assert_eq!(config.player.max_speed, 500.0);
        assert_eq!(config.ring_size(), 3);
        assert_eq!(config.tiles_per_chunk(), 8);
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = SimConfig::from_ron_str("(spawning: (max_mobs: 3))").unwrap();
        assert_eq!(config.spawning.max_mobs, 3);
        assert_eq!(config.spawning.despawn_distance, 20000.0);
        assert_eq!(config.world, WorldConfig::default());
    }

    #[test]
    fn test_ron_roundtrip() {
        let mut config = SimConfig::default();
        config.world.load_chunk_size = 5;
        let text = config.to_ron_string().unwrap();
        let parsed = SimConfig::from_ron_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_malformed_ron_is_parse_error() {
        let err = SimConfig::from_ron_str("(world: (chunk_size: \"big\"))").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("selement-config-that-does-not-exist.ron");
        assert!(matches!(
            SimConfig::load(&path),
            Err(ConfigError::Io { .. })
        ));
        assert_eq!(SimConfig::load_or_default(&path).unwrap(), SimConfig::default());
    }

    #[test]
    fn test_validated_clamps() {
        let mut config = SimConfig::default();
        config.world.load_chunk_size = 4;
        config.world.tile_size = 0;
        config.spawning.spawn_distance_min = 500.0;
        config.spawning.spawn_distance_max = 100.0;

        let config = config.validated();
        assert_eq!(config.world.load_chunk_size, 5);
        assert_eq!(config.world.tile_size, 1024);
        assert_eq!(config.spawning.spawn_distance_min, 100.0);
        assert_eq!(config.spawning.spawn_distance_max, 500.0);
        assert_eq!(config.ring_size(), 5);
    }

    #[test]
    fn test_offset_max_stays_in_precise_range() {
        let mut config = SimConfig::default();
        config.world.offset_max = 5.0e8;
        let config = config.validated();
        assert_eq!(config.world.offset_max, PRECISE_COORDINATE_LIMIT);

        let edge = PRECISE_COORDINATE_LIMIT;
        assert_eq!((edge + 0.125) - edge, 0.125);
        assert_eq!(SimConfig::default().validated().world.offset_max, 8192.0);
    }
}
