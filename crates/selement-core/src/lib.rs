//! Runtime core of Selement: biomes, chunk streaming, mobs and collision
//!
//! The crate is a pure, single-threaded simulation. A host creates a
//! [`World`](world::World) (or a [`Room`](world::Room)), feeds it decoded
//! input once per frame through [`GameContainer::update`](world::GameContainer::update)
//! and draws what [`background`](world::GameContainer::background) and
//! [`render_items`](world::GameContainer::render_items) return.

pub mod assets;
pub mod collision;
pub mod config;
pub mod entity;
pub mod mob;
pub mod timer;
pub mod world;

pub use assets::AssetBundle;
pub use config::{ConfigError, SimConfig};
pub use entity::{Player, PlayerAction, PlayerInput};
pub use world::{GameContainer, Room, World};
