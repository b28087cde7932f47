//! Sorting and simulation systems.
//!
//! Submodules overview
//! - [`isosort`] – keep the sorter in sync with entities and write draw orders
//! - [`movement`] – integrate positions from rigid body velocities and time
//! - [`time`] – update simulation time and delta

pub mod isosort;
pub mod movement;
pub mod time;
