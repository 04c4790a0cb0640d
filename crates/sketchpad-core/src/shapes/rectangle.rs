//! Rectangle geometry.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Create a rectangle from two corner points, in any drag direction.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self::from_rect(Rect::from_points(p1, p2))
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.left,
            self.top,
            self.left + self.width,
            self.top + self.height,
        )
    }

    /// Corners clockwise from top-left.
    pub fn corners(&self) -> [Point; 4] {
        let r = self.as_rect();
        [
            Point::new(r.x0, r.y0),
            Point::new(r.x1, r.y0),
            Point::new(r.x1, r.y1),
            Point::new(r.x0, r.y1),
        ]
    }

    /// Closed outline edges.
    pub fn edges(&self) -> [(Point, Point); 4] {
        let c = self.corners();
        [(c[0], c[1]), (c[1], c[2]), (c[2], c[3]), (c[3], c[0])]
    }

    pub fn bounds(&self) -> Rect {
        self.as_rect()
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.left += delta.x;
        self.top += delta.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes_every_quadrant() {
        let expected = Rectangle::new(10.0, 10.0, 40.0, 40.0);
        let corners = [
            (Point::new(10.0, 10.0), Point::new(50.0, 50.0)),
            (Point::new(50.0, 50.0), Point::new(10.0, 10.0)),
            (Point::new(50.0, 10.0), Point::new(10.0, 50.0)),
            (Point::new(10.0, 50.0), Point::new(50.0, 10.0)),
        ];
        for (a, b) in corners {
            assert_eq!(Rectangle::from_corners(a, b), expected);
        }
    }

    #[test]
    fn test_bounds() {
        let rect = Rectangle::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.bounds(), Rect::new(10.0, 20.0, 110.0, 70.0));
    }
}
