//! Collision geometry - bit masks and positioned shapes

mod mask;
mod shape;

pub use mask::Mask;
pub use shape::{Anchor, CollisionShape, DEFAULT_COLLIDER_RADIUS, ShapeSource};
