//! Line segment geometry.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A straight segment. Direction is meaningful: `(x1, y1)` is the start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub fn length(&self) -> f64 {
        self.start().distance(self.end())
    }

    pub fn midpoint(&self) -> Point {
        self.start().midpoint(self.end())
    }

    /// Point at parameter `t` along the segment (0 = start, 1 = end).
    pub fn point_at(&self, t: f64) -> Point {
        self.start().lerp(self.end(), t)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.start(), self.end())
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x1 += delta.x;
        self.y1 += delta.y;
        self.x2 += delta.x;
        self.y2 += delta.y;
    }
}
