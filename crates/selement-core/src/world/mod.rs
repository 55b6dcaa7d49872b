//! World management - biomes, chunk streaming, containers

pub mod biome;
pub mod chunk;
pub mod chunk_manager;
pub mod combat;
pub mod container;
pub mod rng_trait;
mod room;
pub mod visibility;
#[allow(clippy::module_inception)]
mod world;

pub use biome::{Biome, BiomeClassifier, ClimateNoise};
pub use chunk::{Chunk, Tile};
pub use chunk_manager::{ChunkManager, ReconcileStats, to_chunk_center};
pub use combat::CombatSystem;
pub use container::{BackgroundTile, GameContainer, RenderItem, RenderKind};
pub use rng_trait::WorldRng;
pub use room::{PLAYER_START, Room};
pub use visibility::Visibility;
pub use world::World;
