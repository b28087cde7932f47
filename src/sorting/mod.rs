//! Depth ordering core.
//!
//! Everything in this module is independent of the ECS and keyed by any
//! `Copy + Eq + Hash + Debug` sprite key.
//!
//! Submodules overview:
//! - [`footprint`] – point or line sort geometry of a sprite
//! - [`comparator`] – pairwise "which is drawn first" decision
//! - [`graph`] – sprite arena with static and per-pass dependency edges
//! - [`working`] – dense per-pass graph over the working set
//! - [`cycles`] – bounded cycle breaking on the working graph
//! - [`topo`] – topological linearisation
//! - [`order`] – integer draw-order bands
//! - [`manager`] – owner of all of the above, runs the ordering pass
//! - [`error`] – registration and configuration errors

pub mod comparator;
pub mod cycles;
pub mod error;
pub mod footprint;
pub mod graph;
pub mod manager;
pub mod order;
pub mod topo;
pub mod working;

pub use comparator::{DrawOrder, compare};
pub use error::SortError;
pub use footprint::{Footprint, SortType};
pub use graph::{Bucket, DependencyGraph, SpriteDescriptor, SpriteId};
pub use manager::{IsoSortingManager, PassStats, SortHost};
pub use order::OrderBands;
