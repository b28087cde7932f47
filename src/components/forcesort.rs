//! One-shot request to include a sprite in the next ordering pass.
//!
//! Insert [`ForceSort`] on an entity with an
//! [`IsoSorting`](super::isosorting::IsoSorting) component to have it sorted
//! on the next pass even when it is hidden or off screen. The
//! [`iso_sort_system`](crate::systems::isosort::iso_sort_system) removes the
//! marker once the request has been handed to the sorter.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct ForceSort;
