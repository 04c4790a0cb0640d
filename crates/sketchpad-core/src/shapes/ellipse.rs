//! Ellipse geometry.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// An axis-aligned ellipse stored as its bounding box origin plus radii.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub left: f64,
    pub top: f64,
    pub rx: f64,
    pub ry: f64,
}

impl Ellipse {
    pub fn new(left: f64, top: f64, rx: f64, ry: f64) -> Self {
        Self { left, top, rx, ry }
    }

    /// Create an ellipse inscribed in a bounding rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.width() / 2.0, rect.height() / 2.0)
    }

    /// Create a circle.
    pub fn circle(center: Point, radius: f64) -> Self {
        Self::new(center.x - radius, center.y - radius, radius, radius)
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.rx, self.top + self.ry)
    }

    pub fn is_circle(&self) -> bool {
        (self.rx - self.ry).abs() < f64::EPSILON
    }

    /// Radius used by the circular approximation in erase tests.
    pub fn approx_radius(&self) -> f64 {
        self.rx.max(self.ry)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.left,
            self.top,
            self.left + 2.0 * self.rx,
            self.top + 2.0 * self.ry,
        )
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.left += delta.x;
        self.top += delta.y;
    }
}
