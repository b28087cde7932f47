use bevy_ecs::prelude::Resource;

use crate::sorting::manager::PassStats;

/// Statistics of the most recent ordering pass, plus a pass counter.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct SortStats {
    pub last: PassStats,
    pub passes: u64,
}
