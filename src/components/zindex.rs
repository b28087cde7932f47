//! Z-index component for render ordering.
//!
//! The [`ZIndex`] component holds the drawing order of an entity. The sorter
//! writes it every pass for each sprite in its working set; sprites left out
//! of a pass keep their previous value.

use bevy_ecs::prelude::Component;

/// Rendering order for 2D drawing.
///
/// Higher values are drawn later (on top). A renderer sorts by `ZIndex`
/// to get a painter's algorithm.
///
/// Values are unique only within one pass. A sprite left out of the pass
/// keeps its old value, which may equal a fresh value of another sprite.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZIndex(pub i32);
