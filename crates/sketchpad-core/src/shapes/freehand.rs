//! Freehand path geometry.

use crate::geometry;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// An open polyline recorded from pointer samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FreehandPath {
    pub points: Vec<Point>,
}

impl FreehandPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Append a sample, skipping exact repeats of the last one.
    pub fn add_point(&mut self, point: Point) -> bool {
        if self.points.last() == Some(&point) {
            return false;
        }
        self.points.push(point);
        true
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total path length.
    pub fn length(&self) -> f64 {
        geometry::polyline_length(&self.points)
    }

    pub fn bounds(&self) -> Rect {
        geometry::bounds_of(&self.points)
    }

    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }
}
