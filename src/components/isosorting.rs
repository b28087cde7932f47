//! Sort handle authoring data.
//!
//! [`IsoSorting`] marks an entity for depth sorting and describes its
//! footprint relative to the entity's pivot. The
//! [`isosort`](crate::systems::isosort) systems turn it into world-space
//! geometry and keep the sorter in sync with the entity.
//!
//! # Footprint Offsets
//!
//! Offsets are added to the entity's
//! [`MapPosition`](super::mapposition::MapPosition):
//! - a point handle uses its first offset, or the pivot itself if it has none
//! - a line handle needs at least two offsets; more than two form a polyline
//!
//! # Example
//! ```ignore
//! // A wall running from the pivot to 64 units right and 32 units up.
//! let wall = IsoSorting::line(Vec2::zero(), Vec2::new(64.0, -32.0));
//! // A character sorted by its feet.
//! let hero = IsoSorting::point().movable(true);
//! ```

use bevy_ecs::prelude::Component;
use smallvec::SmallVec;

use crate::coords::{Bounds2D, Vec2};
use crate::sorting::error::SortError;
use crate::sorting::footprint::{Footprint, SortType};
use crate::sorting::graph::SpriteDescriptor;

#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct IsoSorting {
    pub sort_type: SortType,
    /// Footprint points relative to the pivot.
    pub offsets: SmallVec<[Vec2; 4]>,
    /// Sort in the background band, below every other sprite.
    pub render_below_all: bool,
    /// The entity moves; its edges are recomputed every pass.
    pub movable: bool,
}

impl IsoSorting {
    /// Point handle at the pivot.
    pub fn point() -> Self {
        Self::default()
    }

    /// Point handle displaced from the pivot.
    pub fn point_at(offset: Vec2) -> Self {
        let mut sorting = Self::default();
        sorting.offsets.push(offset);
        sorting
    }

    /// Straight line handle.
    pub fn line(start: Vec2, end: Vec2) -> Self {
        Self::polyline([start, end])
    }

    /// Polyline handle through `offsets` in order.
    pub fn polyline(offsets: impl IntoIterator<Item = Vec2>) -> Self {
        Self {
            sort_type: SortType::Line,
            offsets: offsets.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn movable(mut self, movable: bool) -> Self {
        self.movable = movable;
        self
    }

    pub fn render_below_all(mut self, render_below_all: bool) -> Self {
        self.render_below_all = render_below_all;
        self
    }

    /// World-space footprint when the pivot is at `pos`.
    pub fn footprint_at(&self, pos: Vec2) -> Result<Footprint, SortError> {
        if self.sort_type == SortType::Point && self.offsets.is_empty() {
            return Ok(Footprint::point(pos));
        }
        Footprint::from_points(self.sort_type, self.offsets.iter().map(|o| pos + *o))
    }

    /// Full registration data when the pivot is at `pos`.
    pub fn descriptor_at(&self, pos: Vec2, bounds: Bounds2D) -> Result<SpriteDescriptor, SortError> {
        Ok(SpriteDescriptor::new(self.footprint_at(pos)?, bounds)
            .with_static(!self.movable)
            .with_always_behind(self.render_below_all))
    }
}
