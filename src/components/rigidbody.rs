//! Kinematic body component.
//!
//! The [`RigidBody`] component stores the velocity of an entity. The
//! [`movement_system`](crate::systems::movement::movement_system) integrates
//! it into the entity's [`MapPosition`](super::mapposition::MapPosition).
//!
//! The `frozen` flag allows temporarily disabling all movement, useful when
//! an entity's position is controlled externally.

use bevy_ecs::prelude::Component;

use crate::coords::Vec2;

/// Kinematic body storing velocity.
///
/// # Fields
/// - `velocity` - Current velocity in world units per second
/// - `frozen` - When true, the movement system skips this entity
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct RigidBody {
    /// Current velocity in world units per second.
    pub velocity: Vec2,
    /// When true, movement system skips this entity.
    pub frozen: bool,
}

impl RigidBody {
    /// Create a RigidBody with zero velocity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a RigidBody moving at `velocity`.
    pub fn with_velocity(velocity: Vec2) -> Self {
        Self {
            velocity,
            frozen: false,
        }
    }
}
