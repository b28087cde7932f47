use bevy_ecs::prelude::Component;

/// Marker for sprites that are not drawn. Hidden sprites stay registered
/// with the sorter but are left out of the ordering pass unless forced.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Hidden;
