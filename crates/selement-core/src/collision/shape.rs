//! Per-entity hit-test geometry
//!
//! A shape is either a sprite silhouette or a filled circle. Overlap is tested
//! in two phases: an axis-aligned bounding-box check, then the bitwise mask
//! test only for boxes that actually intersect.

use std::sync::Arc;

use glam::{IVec2, Vec2};

use super::mask::Mask;

/// Radius used when an entity has no sprite to derive a silhouette from
pub const DEFAULT_COLLIDER_RADIUS: f32 = 32.0;

/// What the silhouette is built from
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeSource {
    /// Sprite silhouette, kept as given
    Mask(Arc<Mask>),
    /// Filled circle, regenerated when the radius changes
    Radius(f32),
}

/// Where the shape's position sits on its bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Center,
    /// Position is the middle of the bottom edge (y grows downward)
    BottomCenter,
}

/// Collision geometry placed in world space
#[derive(Debug, Clone)]
pub struct CollisionShape {
    source: ShapeSource,
    mask: Arc<Mask>,
    anchor: Anchor,
    position: Vec2,
    top_left: IVec2,
}

impl CollisionShape {
    pub fn new(source: ShapeSource, anchor: Anchor, position: Vec2) -> Self {
        let mask = match &source {
            ShapeSource::Mask(mask) => Arc::clone(mask),
            ShapeSource::Radius(radius) => Arc::new(Mask::circle(*radius)),
        };
        let mut shape = Self {
            source,
            mask,
            anchor,
            position,
            top_left: IVec2::ZERO,
        };
        shape.place(position);
        shape
    }

    pub fn from_mask(mask: Arc<Mask>, anchor: Anchor, position: Vec2) -> Self {
        Self::new(ShapeSource::Mask(mask), anchor, position)
    }

    pub fn from_radius(radius: f32, anchor: Anchor, position: Vec2) -> Self {
        Self::new(ShapeSource::Radius(radius), anchor, position)
    }

    /// Move the shape and refresh its data
    ///
    /// A radius shape regenerates its circle when `source` carries a new radius.
    /// A mask shape keeps the silhouette it was built with.
    pub fn update(&mut self, position: Vec2, source: &ShapeSource) {
        if let (ShapeSource::Radius(current), ShapeSource::Radius(next)) = (&self.source, source) {
            if current != next {
                self.source = ShapeSource::Radius(*next);
                self.mask = Arc::new(Mask::circle(*next));
            }
        }
        self.place(position);
    }

    /// Move the shape without touching its silhouette
    pub fn set_position(&mut self, position: Vec2) {
        self.place(position);
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn source(&self) -> &ShapeSource {
        &self.source
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Top-left corner of the bounding box in world pixels
    pub fn top_left(&self) -> IVec2 {
        self.top_left
    }

    /// Bounding box as `(min, max)`, max exclusive
    pub fn bounds(&self) -> (IVec2, IVec2) {
        (self.top_left, self.top_left + self.mask.size())
    }

    /// Cheap bounding-box intersection (touching edges do not count)
    pub fn bounds_intersect(&self, other: &CollisionShape) -> bool {
        let (a_min, a_max) = self.bounds();
        let (b_min, b_max) = other.bounds();
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }

    /// First overlapping pixel, relative to this shape's top-left corner
    pub fn test_overlap(&self, other: &CollisionShape) -> Option<IVec2> {
        if !self.bounds_intersect(other) {
            return None;
        }
        self.mask.overlap(&other.mask, other.top_left - self.top_left)
    }

    /// World position of a point returned by [`Self::test_overlap`]
    pub fn to_world(&self, local: IVec2) -> Vec2 {
        (self.top_left + local).as_vec2()
    }

    fn place(&mut self, position: Vec2) {
        self.position = position;
        let size = self.mask.size().as_vec2();
        let corner = match self.anchor {
            Anchor::Center => position - size / 2.0,
            Anchor::BottomCenter => Vec2::new(position.x - size.x / 2.0, position.y - size.y),
        };
        self.top_left = corner.floor().as_ivec2();
    }
}
