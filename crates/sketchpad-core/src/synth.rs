//! Builds drawables from a drag gesture.

use crate::geometry;
use crate::shapes::{Drawable, Ellipse, Line, Polygon, Rectangle, Shape, Style};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Points of the star drawn by the star tool.
const STAR_POINTS: usize = 5;

/// Shape kinds produced by a two-point drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Circle,
    Line,
    Triangle,
    Diamond,
    Pentagon,
    Hexagon,
    Star,
}

impl ShapeKind {
    /// Size of a quick-inserted shape.
    fn default_size(self) -> Vec2 {
        match self {
            ShapeKind::Rectangle => Vec2::new(100.0, 50.0),
            ShapeKind::Circle => Vec2::new(50.0, 50.0),
            ShapeKind::Line => Vec2::new(100.0, 0.0),
            _ => Vec2::new(100.0, 100.0),
        }
    }
}

/// Geometry for `kind` spanning the drag from `start` to `current`.
///
/// Every kind except `Line` normalizes the drag box, so the drag direction
/// does not matter.
pub fn shape_geometry(kind: ShapeKind, start: Point, current: Point) -> Shape {
    let rect = Rect::from_points(start, current);
    match kind {
        ShapeKind::Rectangle => Shape::Rectangle(Rectangle::from_rect(rect)),
        ShapeKind::Ellipse => Shape::Ellipse(Ellipse::from_rect(rect)),
        ShapeKind::Circle => {
            let radius = rect.width().max(rect.height()) / 2.0;
            Shape::Ellipse(Ellipse::circle(rect.center(), radius))
        }
        ShapeKind::Line => Shape::Line(Line::new(start, current)),
        ShapeKind::Triangle => Shape::Polygon(Polygon::new(geometry::triangle_in_rect(rect).to_vec())),
        ShapeKind::Diamond => Shape::Polygon(Polygon::new(
            geometry::diamond_polygon(rect.center(), rect.width(), rect.height()).to_vec(),
        )),
        ShapeKind::Pentagon => radial(rect, |c, r| geometry::regular_polygon(c, 5, r)),
        ShapeKind::Hexagon => radial(rect, |c, r| geometry::regular_polygon(c, 6, r)),
        ShapeKind::Star => radial(rect, |c, r| geometry::star_polygon(c, STAR_POINTS, r, r / 2.0)),
    }
}

/// Radius-driven polygons: built around the box center, then shifted so the
/// polygon's own bounds start at the drag box's top-left corner.
fn radial(rect: Rect, generate: impl Fn(Point, f64) -> Vec<Point>) -> Shape {
    let radius = rect.width().max(rect.height()) / 2.0;
    let mut polygon = Polygon::new(generate(rect.center(), radius));
    let offset = rect.origin() - polygon.bounds().origin();
    polygon.translate(offset);
    Shape::Polygon(polygon)
}

/// Build a styled drawable for the drag from `start` to `current`.
pub fn synthesize(kind: ShapeKind, start: Point, current: Point, style: &Style) -> Drawable {
    Drawable::new(shape_geometry(kind, start, current), style.clone())
}

/// Default-size drawable centered on `center`, for toolbar quick insert.
pub fn default_shape(kind: ShapeKind, center: Point, style: &Style) -> Drawable {
    let half = kind.default_size() / 2.0;
    synthesize(kind, center - half, center + half, style)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_rect(shape: &Shape, left: f64, top: f64, width: f64, height: f64) {
        let Shape::Rectangle(r) = shape else {
            panic!("expected rectangle, got {:?}", shape);
        };
        assert_eq!((r.left, r.top, r.width, r.height), (left, top, width, height));
    }

    #[test]
    fn test_rectangle_normalizes_all_quadrants() {
        let corners = [
            (Point::new(10.0, 10.0), Point::new(50.0, 50.0)),
            (Point::new(50.0, 50.0), Point::new(10.0, 10.0)),
            (Point::new(50.0, 10.0), Point::new(10.0, 50.0)),
            (Point::new(10.0, 50.0), Point::new(50.0, 10.0)),
        ];
        for (start, end) in corners {
            assert_rect(&shape_geometry(ShapeKind::Rectangle, start, end), 10.0, 10.0, 40.0, 40.0);
        }
    }

    #[test]
    fn test_line_keeps_direction() {
        let start = Point::new(50.0, 50.0);
        let end = Point::new(10.0, 20.0);
        let Shape::Line(line) = shape_geometry(ShapeKind::Line, start, end) else {
            panic!("expected line");
        };
        assert_eq!(line.start(), start);
        assert_eq!(line.end(), end);
    }

    #[test]
    fn test_ellipse_and_circle() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(40.0, 20.0);
        let Shape::Ellipse(e) = shape_geometry(ShapeKind::Ellipse, start, end) else {
            panic!("expected ellipse");
        };
        assert_eq!((e.rx, e.ry), (20.0, 10.0));
        assert_eq!(e.center(), Point::new(20.0, 10.0));

        let Shape::Ellipse(c) = shape_geometry(ShapeKind::Circle, start, end) else {
            panic!("expected circle");
        };
        assert!(c.is_circle());
        assert_eq!(c.rx, 20.0);
        assert_eq!(c.center(), Point::new(20.0, 10.0));
    }

    #[test]
    fn test_radial_shapes_align_to_drag_box() {
        let start = Point::new(100.0, 40.0);
        let end = Point::new(20.0, 120.0);
        for (kind, vertices) in [
            (ShapeKind::Pentagon, 5),
            (ShapeKind::Hexagon, 6),
            (ShapeKind::Star, 10),
        ] {
            let Shape::Polygon(polygon) = shape_geometry(kind, start, end) else {
                panic!("expected polygon for {:?}", kind);
            };
            assert_eq!(polygon.points.len(), vertices);
            let bounds = polygon.bounds();
            assert!((bounds.x0 - 20.0).abs() < EPS);
            assert!((bounds.y0 - 40.0).abs() < EPS);
        }
    }

    #[test]
    fn test_diamond_and_triangle_fill_box() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(60.0, 40.0);
        for kind in [ShapeKind::Diamond, ShapeKind::Triangle] {
            let bounds = shape_geometry(kind, start, end).bounds();
            assert!((bounds.width() - 60.0).abs() < EPS);
            assert!((bounds.height() - 40.0).abs() < EPS);
        }
    }

    #[test]
    fn test_seed_preview_is_degenerate_but_finite() {
        let p = Point::new(7.0, 9.0);
        for kind in [ShapeKind::Star, ShapeKind::Pentagon, ShapeKind::Circle] {
            let bounds = shape_geometry(kind, p, p).bounds();
            assert!(bounds.x0.is_finite() && bounds.y0.is_finite());
            assert!(bounds.width().abs() < EPS);
        }
    }

    #[test]
    fn test_default_shapes() {
        let style = Style::default();
        let center = Point::new(200.0, 200.0);
        let rect = default_shape(ShapeKind::Rectangle, center, &style);
        assert_rect(&rect.shape, 150.0, 175.0, 100.0, 50.0);

        let circle = default_shape(ShapeKind::Circle, center, &style);
        let Shape::Ellipse(e) = circle.shape else {
            panic!("expected circle");
        };
        assert_eq!((e.rx, e.center()), (25.0, center));

        let line = default_shape(ShapeKind::Line, center, &style);
        assert_eq!(line.as_line().map(Line::length), Some(100.0));
    }
}
