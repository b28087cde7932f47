//! Pairwise occlusion comparator.
//!
//! [`compare`] decides which of two footprints is drawn first (further back).
//! A larger depth coordinate means further back. The result is antisymmetric:
//! swapping the arguments always reverses a definite answer.
//!
//! Rules by footprint pair:
//! - point vs point: depth coordinates compared directly
//! - point vs line: the point is classified against the line, either by the
//!   endpoint range, the segment's depth at the point's horizontal position,
//!   or, for polylines, the segment the point projects onto
//! - line vs line: both lines' endpoints are tested against the other line;
//!   when both directions agree that is the answer, otherwise the median
//!   depths decide, then the depth at each line's left end
//!
//! Two lines with the same median and the same left-end depth (such as two
//! copies of one wall) stay indeterminate, like equal point depths.

use crate::coords::Vec2;
use crate::sorting::footprint::Footprint;

/// Horizontal extent below which a segment is treated as vertical.
const VERTICAL_EPSILON: f32 = 1e-6;

/// Outcome of comparing sprite `a` against sprite `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawOrder {
    /// `a` is behind `b` and must be drawn first.
    ABeforeB,
    /// `b` is behind `a` and must be drawn first.
    BBeforeA,
    /// No preference: equal depths.
    Indeterminate,
}

impl DrawOrder {
    /// The outcome with the roles of `a` and `b` swapped.
    #[inline]
    pub fn reverse(self) -> Self {
        match self {
            DrawOrder::ABeforeB => DrawOrder::BBeforeA,
            DrawOrder::BBeforeA => DrawOrder::ABeforeB,
            DrawOrder::Indeterminate => DrawOrder::Indeterminate,
        }
    }

    #[inline]
    pub fn is_definite(self) -> bool {
        self != DrawOrder::Indeterminate
    }

    fn from_depths(a: f32, b: f32) -> Self {
        if a > b {
            DrawOrder::ABeforeB
        } else if a < b {
            DrawOrder::BBeforeA
        } else {
            DrawOrder::Indeterminate
        }
    }
}

/// Compare two footprints. Only geometry is inspected.
pub fn compare(a: &Footprint, b: &Footprint) -> DrawOrder {
    match (a, b) {
        (Footprint::Point(pa), Footprint::Point(pb)) => DrawOrder::from_depths(pa.y, pb.y),
        (Footprint::Point(p), Footprint::Line(_)) => point_vs_line(*p, b),
        (Footprint::Line(_), Footprint::Point(p)) => point_vs_line(*p, a).reverse(),
        (Footprint::Line(_), Footprint::Line(_)) => line_vs_line(a, b),
    }
}

/// Classify `point` (as `a`) against `line` (as `b`). Always definite.
fn point_vs_line(point: Vec2, line: &Footprint) -> DrawOrder {
    if line.points().len() > 2 {
        point_vs_segments(point, line)
    } else {
        point_vs_segment(point, line.first(), line.last())
    }
}

fn point_vs_segments(point: Vec2, line: &Footprint) -> DrawOrder {
    let closest = line
        .points()
        .windows(2)
        .find_map(|seg| projection_on_segment(point, seg[0], seg[1]));

    match closest {
        Some(on_line) => line_depth_vs_point(on_line.y, point),
        None => point_vs_segment(point, line.first(), line.last()),
    }
}

fn point_vs_segment(point: Vec2, start: Vec2, end: Vec2) -> DrawOrder {
    if point.y > start.y && point.y > end.y {
        return DrawOrder::ABeforeB;
    }
    if point.y < start.y && point.y < end.y {
        return DrawOrder::BBeforeA;
    }

    // The point lies within the segment's depth range: compare against the
    // segment extended as a line through both endpoints.
    let dx = end.x - start.x;
    let line_y = if dx.abs() < VERTICAL_EPSILON {
        (start.y + end.y) * 0.5
    } else {
        let slope = (end.y - start.y) / dx;
        start.y + slope * (point.x - start.x)
    };
    line_depth_vs_point(line_y, point)
}

/// A line deeper than the point at its position is drawn first.
#[inline]
fn line_depth_vs_point(line_y: f32, point: Vec2) -> DrawOrder {
    if line_y > point.y {
        DrawOrder::BBeforeA
    } else {
        DrawOrder::ABeforeB
    }
}

/// Perpendicular projection of `p` onto segment `a..b`, if it falls within it.
fn projection_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Option<Vec2> {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return None;
    }
    let t = (p - a).dot(ab) / len_sq;
    if (0.0..=1.0).contains(&t) {
        Some(a + ab * t)
    } else {
        None
    }
}

fn line_vs_line(line1: &Footprint, line2: &Footprint) -> DrawOrder {
    let one_vs_two = agreeing(
        point_vs_line(line1.first(), line2),
        point_vs_line(line1.last(), line2),
    );
    let two_vs_one = agreeing(
        point_vs_line(line2.first(), line1),
        point_vs_line(line2.last(), line1),
    )
    .map(DrawOrder::reverse);

    match (one_vs_two, two_vs_one) {
        (Some(a), Some(b)) if a == b => a,
        _ => match DrawOrder::from_depths(line1.median_depth(), line2.median_depth()) {
            DrawOrder::Indeterminate => {
                DrawOrder::from_depths(left_end_depth(line1), left_end_depth(line2))
            }
            order => order,
        },
    }
}

/// Depth of the endpoint with the smaller horizontal coordinate. The deeper
/// endpoint wins when both share it.
fn left_end_depth(line: &Footprint) -> f32 {
    let (first, last) = (line.first(), line.last());
    if first.x < last.x {
        first.y
    } else if last.x < first.x {
        last.y
    } else {
        first.y.max(last.y)
    }
}

#[inline]
fn agreeing(first: DrawOrder, second: DrawOrder) -> Option<DrawOrder> {
    (first == second).then_some(first)
}
