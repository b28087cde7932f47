use bevy_ecs::prelude::Resource;

use crate::coords::Bounds2D;

/// World rectangle moving bodies are kept inside.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct MoveArea(pub Bounds2D);
