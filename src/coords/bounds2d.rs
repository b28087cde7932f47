//! Axis-aligned world-space rectangle.
//!
//! [`Bounds2D`] is the only spatial test the sorter performs before running
//! the (more expensive) occlusion comparator: two sprites whose bounds do not
//! overlap never get a dependency edge.

use fastrand::Rng;

use super::vec2::Vec2;

/// Axis-aligned bounding rectangle. Edges are inclusive.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Bounds2D {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds2D {
    #[inline]
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Build bounds from two arbitrary corners, normalising so min <= max.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Bounds covering a rectangle of `size` whose top-left sits at `pos - origin`.
    pub fn from_pivot(pos: Vec2, origin: Vec2, size: Vec2) -> Self {
        let p0 = pos - origin;
        let p1 = p0 + size;
        Self::from_corners(p0, p1)
    }

    #[inline]
    pub fn intersects(&self, other: &Bounds2D) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.max_y >= other.min_y
            && other.max_y >= self.min_y
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.min_x <= point.x && self.max_x >= point.x && self.min_y <= point.y && self.max_y >= point.y
    }

    /// Grow to include `other`.
    pub fn encapsulate(&mut self, other: &Bounds2D) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite() && self.min_y.is_finite() && self.max_x.is_finite() && self.max_y.is_finite()
    }

    /// Uniformly random point inside the bounds.
    pub fn random_pos(&self, rng: &mut Rng) -> Vec2 {
        Vec2::new(
            self.min_x + rng.f32() * self.width(),
            self.min_y + rng.f32() * self.height(),
        )
    }
}

impl std::fmt::Display for Bounds2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Min: ({}, {})  Max: ({}, {})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_bounds_intersect_both_ways() {
        let a = Bounds2D::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds2D::new(5.0, 5.0, 15.0, 15.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn touching_edges_count_as_intersection() {
        let a = Bounds2D::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds2D::new(10.0, 0.0, 20.0, 10.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn disjoint_bounds_do_not_intersect() {
        let a = Bounds2D::new(0.0, 0.0, 10.0, 10.0);
        let right = Bounds2D::new(10.5, 0.0, 20.0, 10.0);
        let above = Bounds2D::new(0.0, 11.0, 10.0, 20.0);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&above));
    }

    #[test]
    fn from_pivot_handles_negative_size() {
        let b = Bounds2D::from_pivot(Vec2::new(10.0, 10.0), Vec2::zero(), Vec2::new(-4.0, -2.0));
        assert_eq!(b, Bounds2D::new(6.0, 8.0, 10.0, 10.0));
    }

    #[test]
    fn encapsulate_grows_to_cover_both() {
        let mut a = Bounds2D::new(0.0, 0.0, 1.0, 1.0);
        a.encapsulate(&Bounds2D::new(-2.0, 0.5, 0.5, 3.0));
        assert_eq!(a, Bounds2D::new(-2.0, 0.0, 1.0, 3.0));
    }

    #[test]
    fn random_pos_stays_inside() {
        let b = Bounds2D::new(-5.0, 2.0, 5.0, 4.0);
        let mut rng = Rng::with_seed(7);
        for _ in 0..100 {
            assert!(b.contains(b.random_pos(&mut rng)));
        }
    }
}
