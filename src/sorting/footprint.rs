//! Sprite footprints: the geometry two sprites are compared by.
//!
//! A point footprint behaves like classic pivot sorting. A line footprint
//! declares a range of depths across the sprite's width, which is what makes
//! long walls and fences sort correctly against things standing next to them.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::coords::Vec2;
use crate::sorting::error::SortError;

/// Which kind of footprint a sprite carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    #[default]
    Point,
    Line,
}

/// World-space sort geometry of one sprite.
#[derive(Debug, Clone, PartialEq)]
pub enum Footprint {
    Point(Vec2),
    /// Ordered points; more than two form a polyline compared piecewise.
    Line(SmallVec<[Vec2; 4]>),
}

impl Footprint {
    pub fn point(p: Vec2) -> Self {
        Footprint::Point(p)
    }

    pub fn line(start: Vec2, end: Vec2) -> Self {
        let mut points = SmallVec::new();
        points.push(start);
        points.push(end);
        Footprint::Line(points)
    }

    /// Build a footprint of `kind` from world points.
    ///
    /// A point footprint uses the first point. Fails if there are no points,
    /// or fewer than two for a line.
    pub fn from_points(
        kind: SortType,
        points: impl IntoIterator<Item = Vec2>,
    ) -> Result<Self, SortError> {
        let mut points = points.into_iter();
        let footprint = match kind {
            SortType::Point => Footprint::Point(points.next().ok_or(SortError::EmptyFootprint)?),
            SortType::Line => Footprint::Line(points.collect()),
        };
        footprint.validate()?;
        Ok(footprint)
    }

    pub fn kind(&self) -> SortType {
        match self {
            Footprint::Point(_) => SortType::Point,
            Footprint::Line(_) => SortType::Line,
        }
    }

    pub fn is_point(&self) -> bool {
        matches!(self, Footprint::Point(_))
    }

    pub fn points(&self) -> &[Vec2] {
        match self {
            Footprint::Point(p) => std::slice::from_ref(p),
            Footprint::Line(points) => points,
        }
    }

    pub fn validate(&self) -> Result<(), SortError> {
        let points = self.points();
        match self {
            Footprint::Line(_) if points.is_empty() => return Err(SortError::EmptyFootprint),
            Footprint::Line(_) if points.len() < 2 => {
                return Err(SortError::LineTooShort {
                    points: points.len(),
                });
            }
            _ => {}
        }
        if points.iter().all(|p| p.is_finite()) {
            Ok(())
        } else {
            Err(SortError::NonFiniteCoordinate)
        }
    }

    /// Mean of all points. For a point footprint, the point itself.
    pub fn centroid(&self) -> Vec2 {
        match self {
            Footprint::Point(p) => *p,
            Footprint::Line(points) => {
                let sum = points.iter().fold(Vec2::zero(), |acc, p| acc + *p);
                sum / points.len() as f32
            }
        }
    }

    /// Median depth coordinate over all points.
    pub fn median_depth(&self) -> f32 {
        let points = self.points();
        let mut depths: SmallVec<[f32; 8]> = points.iter().map(|p| p.y).collect();
        depths.sort_by(f32::total_cmp);
        let mid = depths.len() / 2;
        if depths.len() % 2 == 0 {
            (depths[mid - 1] + depths[mid]) * 0.5
        } else {
            depths[mid]
        }
    }

    pub fn first(&self) -> Vec2 {
        self.points()[0]
    }

    pub fn last(&self) -> Vec2 {
        let points = self.points();
        points[points.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn empty_point_footprint_is_rejected() {
        let err = Footprint::from_points(SortType::Point, std::iter::empty()).unwrap_err();
        assert_eq!(err, SortError::EmptyFootprint);
    }

    #[test]
    fn single_point_line_is_rejected() {
        let err = Footprint::from_points(SortType::Line, [Vec2::new(1.0, 1.0)]).unwrap_err();
        assert_eq!(err, SortError::LineTooShort { points: 1 });
        assert_eq!(
            Footprint::Line(SmallVec::new()).validate(),
            Err(SortError::EmptyFootprint)
        );
    }

    #[test]
    fn nan_points_are_rejected() {
        let err = Footprint::from_points(SortType::Point, [Vec2::new(f32::NAN, 0.0)]).unwrap_err();
        assert_eq!(err, SortError::NonFiniteCoordinate);
    }

    #[test]
    fn point_kind_keeps_first_point() {
        let fp = Footprint::from_points(SortType::Point, [Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)])
            .unwrap();
        assert_eq!(fp, Footprint::Point(Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn centroid_and_median_of_line() {
        let fp = Footprint::from_points(
            SortType::Line,
            [Vec2::new(0.0, 0.0), Vec2::new(2.0, 1.0), Vec2::new(4.0, 8.0)],
        )
        .unwrap();
        let c = fp.centroid();
        assert!(approx_eq(c.x, 2.0));
        assert!(approx_eq(c.y, 3.0));
        assert!(approx_eq(fp.median_depth(), 1.0));
        assert!(approx_eq(Footprint::line(Vec2::new(0.0, 2.0), Vec2::new(1.0, 5.0)).median_depth(), 3.5));
    }
}
