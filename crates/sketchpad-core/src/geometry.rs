//! Geometry kernel: distances, projections, segment intersection and
//! polygon point generators.
//!
//! Everything here is pure and allocation-light so it can run inside a
//! pointer-move handler. Degenerate input (zero-length segments, zero radii)
//! falls back to point distances instead of producing NaN.

use kurbo::{Point, Rect};
use std::f64::consts::{FRAC_PI_2, PI};

/// Projection parameter `t` of `p` onto the line through `a` and `b`.
///
/// Not clamped: values below 0 or above 1 lie beyond the segment ends.
/// Returns 0 when `a == b`.
pub fn projection_parameter(p: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return 0.0;
    }
    (p - a).dot(seg) / len_sq
}

/// Closest point to `p` on the segment `a`→`b`.
pub fn closest_point_on_segment(p: Point, a: Point, b: Point) -> Point {
    let t = projection_parameter(p, a, b).clamp(0.0, 1.0);
    a.lerp(b, t)
}

/// Distance from a point to a line segment (a→b).
pub fn distance_point_to_segment(p: Point, a: Point, b: Point) -> f64 {
    p.distance(closest_point_on_segment(p, a, b))
}

/// Crossing point of segments `a1`→`a2` and `b1`→`b2`, if they cross.
///
/// Parallel and collinear segments report no crossing; callers that care
/// about touching collinear segments use [`segments_intersect_or_near`].
pub fn segment_intersection(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    let r = a2 - a1;
    let s = b2 - b1;
    let denom = r.cross(s);
    if denom.abs() < f64::EPSILON {
        return None;
    }
    let qp = b1 - a1;
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(a1 + r * t)
    } else {
        None
    }
}

/// Minimum pairwise endpoint-to-segment distance between two segments.
pub fn segment_endpoint_distance(a1: Point, a2: Point, b1: Point, b2: Point) -> f64 {
    distance_point_to_segment(a1, b1, b2)
        .min(distance_point_to_segment(a2, b1, b2))
        .min(distance_point_to_segment(b1, a1, a2))
        .min(distance_point_to_segment(b2, a1, a2))
}

/// True if the segments cross, or come within `tolerance` of each other.
pub fn segments_intersect_or_near(
    a1: Point,
    a2: Point,
    b1: Point,
    b2: Point,
    tolerance: f64,
) -> bool {
    segment_intersection(a1, a2, b1, b2).is_some()
        || segment_endpoint_distance(a1, a2, b1, b2) <= tolerance
}

/// Pair of closest points `(on_a, on_b)` between two segments.
///
/// Crossing segments return the crossing point twice.
pub fn closest_points_between_segments(
    a1: Point,
    a2: Point,
    b1: Point,
    b2: Point,
) -> (Point, Point) {
    if let Some(p) = segment_intersection(a1, a2, b1, b2) {
        return (p, p);
    }
    let candidates = [
        (a1, closest_point_on_segment(a1, b1, b2)),
        (a2, closest_point_on_segment(a2, b1, b2)),
        (closest_point_on_segment(b1, a1, a2), b1),
        (closest_point_on_segment(b2, a1, a2), b2),
    ];
    candidates
        .into_iter()
        .min_by(|x, y| x.0.distance(x.1).total_cmp(&y.0.distance(y.1)))
        .unwrap_or((a1, b1))
}

/// Vertices of a regular polygon, first vertex at the top (angle -90°).
pub fn regular_polygon(center: Point, sides: usize, radius: f64) -> Vec<Point> {
    if sides == 0 {
        return Vec::new();
    }
    let step = 2.0 * PI / sides as f64;
    (0..sides)
        .map(|i| polar(center, radius, i as f64 * step - FRAC_PI_2))
        .collect()
}

/// Vertices of a star: `2 * points` vertices alternating outer/inner radius,
/// starting with an outer vertex at the top.
pub fn star_polygon(
    center: Point,
    points: usize,
    outer_radius: f64,
    inner_radius: f64,
) -> Vec<Point> {
    if points == 0 {
        return Vec::new();
    }
    let step = PI / points as f64;
    (0..points * 2)
        .map(|i| {
            let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
            polar(center, radius, i as f64 * step - FRAC_PI_2)
        })
        .collect()
}

/// Diamond vertices in order: top, right, bottom, left.
pub fn diamond_polygon(center: Point, width: f64, height: f64) -> [Point; 4] {
    let (hw, hh) = (width / 2.0, height / 2.0);
    [
        Point::new(center.x, center.y - hh),
        Point::new(center.x + hw, center.y),
        Point::new(center.x, center.y + hh),
        Point::new(center.x - hw, center.y),
    ]
}

/// Isosceles triangle filling a box: apex at top-center, base along the bottom.
pub fn triangle_in_rect(rect: Rect) -> [Point; 3] {
    [
        Point::new(rect.center().x, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ]
}

fn polar(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Axis-aligned bounds of a point set (`Rect::ZERO` when empty).
pub fn bounds_of(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
}

/// Total length of an open polyline.
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Edges of a closed polygon, including the closing edge.
pub fn closed_edges(points: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let n = points.len();
    let count = if n < 2 { 0 } else { n };
    (0..count).map(move |i| (points[i], points[(i + 1) % n]))
}

/// Inclusive rectangle overlap; zero-width rectangles still overlap.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Inclusive point containment.
pub fn rect_contains(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_distance_to_degenerate_segment() {
        let a = Point::new(3.0, 4.0);
        for p in [Point::ZERO, Point::new(-2.0, 7.5), Point::new(3.0, 4.0)] {
            let d = distance_point_to_segment(p, a, a);
            assert!((d - p.distance(a)).abs() < EPS);
            assert!(d.is_finite());
        }
    }

    #[test]
    fn test_distance_clamps_to_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((distance_point_to_segment(Point::new(5.0, 3.0), a, b) - 3.0).abs() < EPS);
        assert!((distance_point_to_segment(Point::new(-4.0, 3.0), a, b) - 5.0).abs() < EPS);
        assert!((distance_point_to_segment(Point::new(13.0, 4.0), a, b) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_projection_parameter_unclamped() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert!((projection_parameter(Point::new(50.0, 9.0), a, b) - 0.5).abs() < EPS);
        assert!((projection_parameter(Point::new(-50.0, 0.0), a, b) + 0.5).abs() < EPS);
        assert!((projection_parameter(Point::new(150.0, 0.0), a, b) - 1.5).abs() < EPS);
        assert_eq!(projection_parameter(Point::new(1.0, 1.0), a, a), 0.0);
    }

    #[test]
    fn test_crossing_segments() {
        let hit = segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
        )
        .unwrap();
        assert!((hit.x - 5.0).abs() < EPS && (hit.y - 5.0).abs() < EPS);
    }

    #[test]
    fn test_parallel_segments_fall_back_to_distance() {
        let a1 = Point::new(0.0, 0.0);
        let a2 = Point::new(10.0, 0.0);
        let b1 = Point::new(0.0, 3.0);
        let b2 = Point::new(10.0, 3.0);
        assert!(segment_intersection(a1, a2, b1, b2).is_none());
        assert!(segments_intersect_or_near(a1, a2, b1, b2, 3.0));
        assert!(!segments_intersect_or_near(a1, a2, b1, b2, 2.9));
    }

    #[test]
    fn test_disjoint_segments() {
        assert!(!segments_intersect_or_near(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(6.0, 9.0),
            1.0,
        ));
    }

    #[test]
    fn test_closest_points_between_disjoint_segments() {
        let (on_a, on_b) = closest_points_between_segments(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(40.0, 5.0),
            Point::new(40.0, 20.0),
        );
        assert!((on_a.x - 40.0).abs() < EPS && on_a.y.abs() < EPS);
        assert!((on_b.y - 5.0).abs() < EPS);
    }

    #[test]
    fn test_regular_polygon_vertex_count_and_top_vertex() {
        let center = Point::new(50.0, 50.0);
        for sides in 3..9 {
            let pts = regular_polygon(center, sides, 20.0);
            assert_eq!(pts.len(), sides);
            for p in &pts {
                assert!((p.distance(center) - 20.0).abs() < EPS);
            }
            assert!((pts[0].x - 50.0).abs() < EPS);
            assert!((pts[0].y - 30.0).abs() < EPS);
        }
        assert!(regular_polygon(center, 0, 10.0).is_empty());
    }

    #[test]
    fn test_star_alternates_radii() {
        let center = Point::new(0.0, 0.0);
        let pts = star_polygon(center, 5, 40.0, 20.0);
        assert_eq!(pts.len(), 10);
        for (i, p) in pts.iter().enumerate() {
            let expected = if i % 2 == 0 { 40.0 } else { 20.0 };
            assert!((p.distance(center) - expected).abs() < EPS);
        }
    }

    #[test]
    fn test_diamond_order() {
        let [top, right, bottom, left] = diamond_polygon(Point::new(10.0, 10.0), 8.0, 6.0);
        assert_eq!(top, Point::new(10.0, 7.0));
        assert_eq!(right, Point::new(14.0, 10.0));
        assert_eq!(bottom, Point::new(10.0, 13.0));
        assert_eq!(left, Point::new(6.0, 10.0));
    }

    #[test]
    fn test_bounds_and_length() {
        let pts = [Point::new(1.0, 5.0), Point::new(4.0, 1.0), Point::new(4.0, 9.0)];
        let b = bounds_of(&pts);
        assert_eq!(b, Rect::new(1.0, 1.0, 4.0, 9.0));
        assert!((polyline_length(&pts) - 13.0).abs() < EPS);
        assert_eq!(bounds_of(&[]), Rect::ZERO);
    }

    #[test]
    fn test_closed_edges_wrap() {
        let pts = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)];
        let edges: Vec<_> = closed_edges(&pts).collect();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2], (pts[2], pts[0]));
        assert_eq!(closed_edges(&pts[..1]).count(), 0);
    }

    #[test]
    fn test_zero_width_rects_overlap() {
        let line_box = Rect::new(0.0, 5.0, 100.0, 5.0);
        let seg_box = Rect::new(50.0, 0.0, 50.0, 10.0);
        assert!(rects_overlap(line_box, seg_box));
        assert!(rect_contains(line_box, Point::new(20.0, 5.0)));
    }
}
