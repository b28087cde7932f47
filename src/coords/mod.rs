//! World-space coordinate primitives shared by the sorter and the ECS layer.
//!
//! - [`vec2`] – 2D vector (x = horizontal, y = depth coordinate)
//! - [`bounds2d`] – axis-aligned rectangle with an intersection predicate

pub mod bounds2d;
pub mod vec2;

pub use bounds2d::Bounds2D;
pub use vec2::Vec2;
