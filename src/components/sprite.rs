use bevy_ecs::prelude::Component;

use crate::coords::{Bounds2D, Vec2};

/// Sprite is identified by a name and its size in world units.
/// The origin selects the pivot point relative to the sprite's top-left
/// corner; the sprite is placed so its origin sits on the entity's
/// [`MapPosition`](super::mapposition::MapPosition).
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Sprite {
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub origin: Vec2,
}

impl Sprite {
    pub fn new(name: impl Into<String>, width: f32, height: f32, origin: Vec2) -> Self {
        Sprite {
            name: name.into(),
            width,
            height,
            origin,
        }
    }

    /// Axis-aligned world rectangle covered by the sprite when its pivot is at `pos`.
    pub fn world_bounds(&self, pos: Vec2) -> Bounds2D {
        Bounds2D::from_pivot(pos, self.origin, Vec2::new(self.width, self.height))
    }
}
