//! Isometric sprite sorting library.
//!
//! This module exposes the ECS-free depth-ordering core ([`sorting`]) and
//! the ECS components, resources and systems that drive it from a bevy
//! world, for use in integration tests and as a reusable library.

pub mod components;
pub mod coords;
pub mod resources;
pub mod scene;
pub mod sorting;
pub mod systems;
