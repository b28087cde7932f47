//! Sorter resource.
//!
//! [`IsoSorter`] wraps an [`IsoSortingManager`] keyed by [`Entity`] so the
//! sorting systems can reach it through `ResMut<IsoSorter>`. It derefs to
//! the manager, so all manager operations are available directly.

use std::ops::{Deref, DerefMut};

use bevy_ecs::prelude::*;

use crate::resources::sortconfig::SortConfig;
use crate::sorting::error::SortError;
use crate::sorting::manager::IsoSortingManager;

#[derive(Resource, Debug, Default)]
pub struct IsoSorter(pub IsoSortingManager<Entity>);

impl IsoSorter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &SortConfig) -> Result<Self, SortError> {
        Ok(Self(IsoSortingManager::with_config(config)?))
    }
}

impl Deref for IsoSorter {
    type Target = IsoSortingManager<Entity>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for IsoSorter {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
