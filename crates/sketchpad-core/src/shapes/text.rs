//! Text geometry.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A text label anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 16.0;

    pub fn new(position: Point, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            x: position.x,
            y: position.y,
            font_size: Self::DEFAULT_FONT_SIZE,
        }
    }

    /// True when the content is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    // The renderer owns real text layout; these estimates only drive
    // hit testing and erasing.
    fn approximate_width(&self) -> f64 {
        let max_line_len = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        max_line_len as f64 * self.font_size * 0.55
    }

    fn approximate_height(&self) -> f64 {
        let line_count = self.content.lines().count().max(1);
        let line_count = if self.content.ends_with('\n') {
            line_count + 1
        } else {
            line_count
        };
        line_count as f64 * self.font_size * 1.2
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.x,
            self.y,
            self.x + self.approximate_width().max(20.0),
            self.y + self.approximate_height(),
        )
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }
}
