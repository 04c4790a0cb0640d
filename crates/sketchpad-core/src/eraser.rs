//! Precision eraser.
//!
//! Every pointer move contributes one segment `(prev, curr)`. Each drawable
//! touched by the segment (inflated by the eraser radius) is erased by a
//! kind-specific policy:
//!
//! - lines hit well inside their span are cut in two, leaving a gap around
//!   the hit point;
//! - everything else (and lines hit near an end) loses opacity and is
//!   removed once it fades below the removal threshold.

use crate::config::EraserConfig;
use crate::geometry;
use crate::scene::Scene;
use crate::shapes::{Drawable, DrawableId, Line, Shape};
use kurbo::{Point, Rect};

/// Slack when comparing faded opacity against the removal threshold.
const OPACITY_EPSILON: f64 = 1e-9;

/// Points traced by one eraser gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct EraserStroke {
    pub points: Vec<Point>,
    pub radius: f64,
}

/// What an erase pass changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EraseReport {
    pub removed: Vec<DrawableId>,
    /// Original line id and the pieces that replaced it.
    pub split: Vec<(DrawableId, Vec<DrawableId>)>,
    pub faded: Vec<DrawableId>,
}

impl EraseReport {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.split.is_empty() && self.faded.is_empty()
    }

}

#[derive(Debug, Clone, Default)]
pub struct EraserEngine {
    config: EraserConfig,
    stroke: Option<EraserStroke>,
}

impl EraserEngine {
    pub fn new(config: EraserConfig) -> Self {
        Self {
            config,
            stroke: None,
        }
    }

    pub fn config(&self) -> &EraserConfig {
        &self.config
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.config.radius = radius.max(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.stroke.is_some()
    }

    /// The stroke in progress, for drawing the eraser trail.
    pub fn stroke(&self) -> Option<&EraserStroke> {
        self.stroke.as_ref()
    }

    /// Start a stroke at `point`.
    pub fn begin(&mut self, point: Point) {
        self.stroke = Some(EraserStroke {
            points: vec![point],
            radius: self.config.radius,
        });
    }

    /// Extend the stroke to `point` and erase along the new segment.
    ///
    /// Without a stroke in progress the segment degenerates to `point` itself.
    pub fn extend(&mut self, point: Point, scene: &mut Scene) -> EraseReport {
        let radius = self.config.radius;
        let prev = match &mut self.stroke {
            Some(stroke) => {
                let prev = stroke.points.last().copied().unwrap_or(point);
                stroke.points.push(point);
                prev
            }
            None => point,
        };
        self.process_segment(prev, point, radius, scene)
    }

    /// Finish the stroke and hand it back.
    pub fn end(&mut self) -> Option<EraserStroke> {
        self.stroke.take()
    }

    /// Erase everything touched by the segment `prev`→`curr`.
    pub fn process_segment(
        &self,
        prev: Point,
        curr: Point,
        radius: f64,
        scene: &mut Scene,
    ) -> EraseReport {
        let mut report = EraseReport::default();
        let reach = Rect::from_points(prev, curr);

        for id in scene.ids() {
            let Some(drawable) = scene.get(id) else {
                continue;
            };
            if !geometry::rects_overlap(drawable.bounds().inflate(radius, radius), reach) {
                continue;
            }
            let Some(hit) = hit_point(&drawable.shape, prev, curr, radius) else {
                continue;
            };

            if let Some(line) = drawable.as_line() {
                let t = geometry::projection_parameter(hit, line.start(), line.end());
                if t > self.config.split_min_t && t < self.config.split_max_t {
                    let pieces = self.split_line(drawable, line, t, radius);
                    self.apply_split(scene, id, pieces, &mut report);
                    continue;
                }
                self.fade(scene, id, self.config.line_decay, &mut report);
                continue;
            }

            let decay = self.decay_for(drawable, prev, curr);
            self.fade(scene, id, decay, &mut report);
        }
        report
    }

    /// The two pieces left after cutting a gap into `line` at parameter `t`.
    fn split_line(&self, original: &Drawable, line: &Line, t: f64, radius: f64) -> Vec<Drawable> {
        let length = line.length();
        let half_gap = self.config.split_gap_factor * radius;
        let direction = (line.end() - line.start()) / length;
        let cut = line.point_at(t);

        let mut pieces = Vec::with_capacity(2);
        if t * length - half_gap >= self.config.min_piece_length {
            pieces.push((line.start(), cut - direction * half_gap));
        }
        if (1.0 - t) * length - half_gap >= self.config.min_piece_length {
            pieces.push((cut + direction * half_gap, line.end()));
        }
        pieces
            .into_iter()
            .map(|(start, end)| {
                let mut piece = original.clone();
                piece.shape = Shape::Line(Line::new(start, end));
                piece.regenerate_id();
                piece
            })
            .collect()
    }

    fn apply_split(
        &self,
        scene: &mut Scene,
        id: DrawableId,
        pieces: Vec<Drawable>,
        report: &mut EraseReport,
    ) {
        match scene.replace(id, pieces) {
            Some(new_ids) if new_ids.is_empty() => {
                log::debug!("Line {} erased completely", id);
                report.removed.push(id);
            }
            Some(new_ids) => {
                log::debug!("Line {} split into {} piece(s)", id, new_ids.len());
                report.split.push((id, new_ids));
            }
            None => {}
        }
    }

    /// Strokes passing near the visual center erase faster than strokes
    /// grazing the edge.
    fn decay_for(&self, drawable: &Drawable, prev: Point, curr: Point) -> f64 {
        let bounds = drawable.bounds();
        let half_extent = bounds.width().max(bounds.height()) / 2.0;
        let center = drawable.shape.center();
        let nearest = geometry::closest_point_on_segment(center, prev, curr);
        if nearest.distance(center) <= 0.5 * half_extent {
            self.config.center_decay
        } else {
            self.config.edge_decay
        }
    }

    fn fade(&self, scene: &mut Scene, id: DrawableId, amount: f64, report: &mut EraseReport) {
        let Some(drawable) = scene.get_mut(id) else {
            return;
        };
        let opacity = drawable.style.fade(amount);
        if opacity <= self.config.removal_threshold + OPACITY_EPSILON {
            scene.remove(id);
            log::debug!("Drawable {} faded out and was removed", id);
            report.removed.push(id);
        } else {
            report.faded.push(id);
        }
    }
}

/// Where the segment touches `shape`, if it does.
fn hit_point(shape: &Shape, prev: Point, curr: Point, radius: f64) -> Option<Point> {
    match shape {
        Shape::Line(line) => {
            let (a, b) = (line.start(), line.end());
            geometry::segments_intersect_or_near(prev, curr, a, b, radius)
                .then(|| geometry::closest_points_between_segments(prev, curr, a, b).1)
        }
        Shape::FreehandPath(path) => path
            .points
            .iter()
            .copied()
            .find(|v| geometry::distance_point_to_segment(*v, prev, curr) <= radius),
        Shape::Rectangle(rect) => edge_hit(rect.edges().into_iter(), prev, curr, radius),
        Shape::Polygon(polygon) => edge_hit(polygon.edges(), prev, curr, radius),
        Shape::Ellipse(ellipse) => {
            let center = ellipse.center();
            (geometry::distance_point_to_segment(center, prev, curr)
                <= radius + ellipse.approx_radius())
            .then(|| geometry::closest_point_on_segment(center, prev, curr))
        }
        Shape::Text(text) => {
            let bounds = text.bounds();
            let corners = [
                Point::new(bounds.x0, bounds.y0),
                Point::new(bounds.x1, bounds.y0),
                Point::new(bounds.x1, bounds.y1),
                Point::new(bounds.x0, bounds.y1),
            ];
            let inside = geometry::rect_contains(bounds, prev) || geometry::rect_contains(bounds, curr);
            if inside {
                Some(geometry::closest_point_on_segment(bounds.center(), prev, curr))
            } else {
                edge_hit(geometry::closed_edges(&corners), prev, curr, radius)
            }
        }
    }
}

fn edge_hit(
    mut edges: impl Iterator<Item = (Point, Point)>,
    prev: Point,
    curr: Point,
    radius: f64,
) -> Option<Point> {
    edges
        .find(|&(a, b)| geometry::segments_intersect_or_near(prev, curr, a, b, radius))
        .map(|(a, b)| geometry::closest_points_between_segments(prev, curr, a, b).1)
}
