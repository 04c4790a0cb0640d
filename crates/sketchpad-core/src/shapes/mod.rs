//! Drawable definitions: per-kind geometry plus shared style.

mod ellipse;
mod freehand;
mod line;
mod polygon;
mod rectangle;
mod style;
mod text;

pub use ellipse::Ellipse;
pub use freehand::FreehandPath;
pub use line::Line;
pub use polygon::Polygon;
pub use rectangle::Rectangle;
pub use style::{Color, Style};
pub use text::Text;

use crate::geometry;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for drawables.
pub type DrawableId = Uuid;

/// Identifier shared by the members of a group.
pub type GroupId = Uuid;

/// Serialized `type` tags, in declaration order of [`Shape`].
pub const SHAPE_TYPES: [&str; 6] = [
    "rectangle",
    "ellipse",
    "line",
    "polygon",
    "freehandPath",
    "text",
];

/// Closed set of drawable geometries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Line(Line),
    Polygon(Polygon),
    FreehandPath(FreehandPath),
    Text(Text),
}

impl Shape {
    /// The serialized `type` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Rectangle(_) => SHAPE_TYPES[0],
            Shape::Ellipse(_) => SHAPE_TYPES[1],
            Shape::Line(_) => SHAPE_TYPES[2],
            Shape::Polygon(_) => SHAPE_TYPES[3],
            Shape::FreehandPath(_) => SHAPE_TYPES[4],
            Shape::Text(_) => SHAPE_TYPES[5],
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Ellipse(s) => s.bounds(),
            Shape::Line(s) => s.bounds(),
            Shape::Polygon(s) => s.bounds(),
            Shape::FreehandPath(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Rectangle(s) => s.translate(delta),
            Shape::Ellipse(s) => s.translate(delta),
            Shape::Line(s) => s.translate(delta),
            Shape::Polygon(s) => s.translate(delta),
            Shape::FreehandPath(s) => s.translate(delta),
            Shape::Text(s) => s.translate(delta),
        }
    }

    /// Visual center used by the eraser's decay policy.
    pub fn center(&self) -> Point {
        match self {
            Shape::Ellipse(e) => e.center(),
            Shape::Line(l) => l.midpoint(),
            _ => self.bounds().center(),
        }
    }
}

/// One visible primitive on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: DrawableId,
    #[serde(flatten)]
    pub shape: Shape,
    #[serde(flatten)]
    pub style: Style,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) group: Option<GroupId>,
}

impl Drawable {
    pub fn new(shape: Shape, style: Style) -> Self {
        Self {
            id: Uuid::new_v4(),
            shape,
            style,
            group: None,
        }
    }

    pub fn id(&self) -> DrawableId {
        self.id
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub fn type_name(&self) -> &'static str {
        self.shape.type_name()
    }

    pub fn bounds(&self) -> Rect {
        self.shape.bounds()
    }

    pub fn opacity(&self) -> f64 {
        self.style.opacity
    }

    /// Bounding-box hit test, inclusive of edges.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        geometry::rect_contains(self.bounds().inflate(tolerance, tolerance), point)
    }

    /// Give this drawable a fresh identity (used when an id collides).
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    pub fn as_line(&self) -> Option<&Line> {
        match &self.shape {
            Shape::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match &self.shape {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_layout_is_flat() {
        let drawable = Drawable::new(
            Shape::Rectangle(Rectangle::new(10.0, 20.0, 30.0, 40.0)),
            Style::new(Color::black(), 3.0),
        );
        let value = serde_json::to_value(&drawable).unwrap();
        assert_eq!(value["type"], "rectangle");
        assert_eq!(value["left"], 10.0);
        assert_eq!(value["height"], 40.0);
        assert_eq!(value["stroke"], "#000000");
        assert_eq!(value["strokeWidth"], 3.0);
        assert_eq!(value["fill"], serde_json::Value::Null);
        assert_eq!(value["opacity"], 1.0);
        assert!(value.get("group").is_none());
        assert_eq!(value["id"], drawable.id().to_string());
    }

    #[test]
    fn test_record_parses_with_integer_fields_and_no_id() {
        let record = json!({
            "type": "line",
            "x1": 0, "y1": 0, "x2": 100, "y2": 0,
            "stroke": "#ff0000",
        });
        let drawable: Drawable = serde_json::from_value(record).unwrap();
        assert_eq!(
            drawable.shape,
            Shape::Line(Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0)))
        );
        assert_eq!(drawable.style.stroke, Color::new(255, 0, 0, 255));
        assert_eq!(drawable.style.stroke_width, 2.0);
    }

    #[test]
    fn test_text_record_uses_font_size_key() {
        let record = json!({
            "type": "text", "content": "hi", "x": 1, "y": 2, "fontSize": 20,
        });
        let drawable: Drawable = serde_json::from_value(record).unwrap();
        assert_eq!(drawable.as_text().map(|t| t.font_size), Some(20.0));
        assert_eq!(
            serde_json::to_value(&drawable).unwrap()["fontSize"],
            20.0
        );
    }

    #[test]
    fn test_type_names_match_serialized_tags() {
        let shapes = [
            Shape::Rectangle(Rectangle::new(0.0, 0.0, 1.0, 1.0)),
            Shape::Ellipse(Ellipse::new(0.0, 0.0, 1.0, 1.0)),
            Shape::Line(Line::new(Point::ZERO, Point::new(1.0, 1.0))),
            Shape::Polygon(Polygon::new(vec![Point::ZERO])),
            Shape::FreehandPath(FreehandPath::from_points(vec![Point::ZERO])),
            Shape::Text(Text::new(Point::ZERO, "x")),
        ];
        for (shape, tag) in shapes.into_iter().zip(SHAPE_TYPES) {
            let value = serde_json::to_value(&shape).unwrap();
            assert_eq!(value["type"], tag);
            assert_eq!(shape.type_name(), tag);
        }
    }

    #[test]
    fn test_hit_test_includes_degenerate_boxes() {
        let line = Drawable::new(
            Shape::Line(Line::new(Point::new(0.0, 10.0), Point::new(100.0, 10.0))),
            Style::default(),
        );
        assert!(line.hit_test(Point::new(50.0, 10.0), 0.0));
        assert!(line.hit_test(Point::new(50.0, 12.0), 3.0));
        assert!(!line.hit_test(Point::new(50.0, 20.0), 3.0));
    }
}
