//! Visible world region used by the sorting pass.
//!
//! The [`SortView`] resource plays the role of the camera for the sorter:
//! sprites whose bounds miss the view rectangle are left out of the pass,
//! and the horizontal focus is where the configured sort range is measured
//! from. With neither set, every non-hidden sprite is sorted.

use bevy_ecs::prelude::Resource;

use crate::coords::{Bounds2D, Vec2};

#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct SortView {
    /// World rectangle on screen. `None` means everything is on screen.
    pub rect: Option<Bounds2D>,
    /// Horizontal focus for the sort range, usually the player or camera target.
    pub focus_x: Option<f32>,
}

impl SortView {
    /// View covering `rect`, focused on its horizontal centre.
    pub fn from_rect(rect: Bounds2D) -> Self {
        SortView {
            rect: Some(rect),
            focus_x: Some((rect.min_x + rect.max_x) * 0.5),
        }
    }

    /// View of `size` centred on `center`.
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::from_rect(Bounds2D::from_corners(center - half, center + half))
    }

    pub fn is_on_screen(&self, bounds: &Bounds2D) -> bool {
        self.rect.is_none_or(|rect| rect.intersects(bounds))
    }
}
