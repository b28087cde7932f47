//! Velocity integration for moving sprites.
//!
//! [`movement_system`] advances every [`MapPosition`] by its [`RigidBody`]
//! velocity. When a [`MoveArea`] resource is present, bodies bounce off its
//! edges: the position is clamped back inside and the velocity component
//! along the crossed axis is reflected.

use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::resources::movearea::MoveArea;
use crate::resources::worldtime::WorldTime;

pub fn movement_system(
    mut query: Query<(&mut MapPosition, &mut RigidBody)>,
    time: Res<WorldTime>,
    area: Option<Res<MoveArea>>,
) {
    for (mut position, mut rigidbody) in query.iter_mut() {
        if rigidbody.frozen {
            continue;
        }
        let mut pos = position.pos + rigidbody.velocity * time.delta;

        if let Some(area) = area.as_deref() {
            let bounds = area.0;
            if pos.x < bounds.min_x || pos.x > bounds.max_x {
                pos.x = pos.x.clamp(bounds.min_x, bounds.max_x);
                rigidbody.velocity.x = -rigidbody.velocity.x;
            }
            if pos.y < bounds.min_y || pos.y > bounds.max_y {
                pos.y = pos.y.clamp(bounds.min_y, bounds.max_y);
                rigidbody.velocity.y = -rigidbody.velocity.y;
            }
        }

        if pos != position.pos {
            position.pos = pos;
        }
    }
}
