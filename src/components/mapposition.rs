//! World-space position of an entity's pivot.

use bevy_ecs::prelude::Component;

use crate::coords::Vec2;

/// Pivot position in world units. `pos.y` is the depth coordinate used by
/// the sorter.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct MapPosition {
    pub pos: Vec2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        MapPosition {
            pos: Vec2::new(x, y),
        }
    }
}
