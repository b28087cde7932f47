//! ECS components for sorted entities.
//!
//! This module groups the component types the sorting systems read and
//! write. Components define data such as position, sprite extent, sort
//! handles and the resulting draw order.
//!
//! Submodules overview:
//! - [`forcesort`] – one-shot request to sort an entity on the next pass
//! - [`hidden`] – marker for sprites that are not drawn
//! - [`isosorting`] – sort handle: footprint offsets and sorting flags
//! - [`mapposition`] – world-space position (pivot) for an entity
//! - [`rigidbody`] – simple kinematic body storing velocity
//! - [`sprite`] – sprite extent and pivot, source of world bounds
//! - [`zindex`] – rendering order written by the sorter

pub mod forcesort;
pub mod hidden;
pub mod isosorting;
pub mod mapposition;
pub mod rigidbody;
pub mod sprite;
pub mod zindex;
