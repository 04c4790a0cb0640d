//! Draft controller: turns pointer sequences into committed drawables.

use crate::config::DraftConfig;
use crate::scene::Scene;
use crate::shapes::{Drawable, DrawableId, FreehandPath, Shape, Style, Text};
use crate::synth::{self, ShapeKind};
use crate::tools::ToolKind;
use kurbo::Point;

/// State of the drafting state machine.
#[derive(Debug, Clone, Default)]
pub enum DraftState {
    #[default]
    Idle,
    /// A shape drag is in progress; `preview` is not in the scene yet.
    Drafting {
        kind: ShapeKind,
        anchor: Point,
        preview: Drawable,
    },
    /// A freehand stroke is being recorded into `preview`.
    FreehandDrawing { preview: Drawable },
    /// A text drawable in the scene is being edited by the host.
    /// `placed` marks the undo step pushed when it was placed.
    TextEditing { id: DrawableId, placed: u64 },
}

/// What a controller call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftEvent {
    /// Nothing to do for this input.
    Ignored,
    Started,
    Updated,
    Committed(DrawableId),
    /// Below the minimum size; nothing was added.
    Discarded,
    TextStarted(DrawableId),
    TextKept(DrawableId),
    /// Text was blank on commit and left the scene.
    TextRemoved(DrawableId),
}

/// Drives shape, freehand and text creation.
#[derive(Debug, Clone, Default)]
pub struct DraftController {
    state: DraftState,
    config: DraftConfig,
}

impl DraftController {
    pub fn new(config: DraftConfig) -> Self {
        Self {
            state: DraftState::Idle,
            config,
        }
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    pub fn config(&self) -> &DraftConfig {
        &self.config
    }

    /// True while a pointer gesture (shape drag or freehand stroke) is open.
    pub fn is_active(&self) -> bool {
        matches!(
            self.state,
            DraftState::Drafting { .. } | DraftState::FreehandDrawing { .. }
        )
    }

    /// The text currently being edited.
    pub fn editing_text(&self) -> Option<DrawableId> {
        match self.state {
            DraftState::TextEditing { id, .. } => Some(id),
            _ => None,
        }
    }

    /// The live preview, if a gesture is open.
    pub fn preview(&self) -> Option<&Drawable> {
        match &self.state {
            DraftState::Drafting { preview, .. } | DraftState::FreehandDrawing { preview } => {
                Some(preview)
            }
            _ => None,
        }
    }

    /// Pointer pressed with `tool` active.
    ///
    /// While a text is being edited the press only ends the editing.
    pub fn pointer_down(
        &mut self,
        scene: &mut Scene,
        tool: ToolKind,
        point: Point,
        style: &Style,
    ) -> DraftEvent {
        match self.state {
            DraftState::TextEditing { .. } => return self.commit_text(scene),
            DraftState::Drafting { .. } | DraftState::FreehandDrawing { .. } => {
                return DraftEvent::Ignored;
            }
            DraftState::Idle => {}
        }

        match tool {
            ToolKind::Draw => {
                let mut path = FreehandPath::new();
                path.add_point(point);
                let preview = Drawable::new(Shape::FreehandPath(path), style.clone());
                self.state = DraftState::FreehandDrawing { preview };
                log::debug!("Freehand stroke started at {:?}", point);
                DraftEvent::Started
            }
            ToolKind::Text => {
                let mut text = Text::new(point, self.config.text_placeholder.clone());
                text.font_size = self.config.font_size;
                scene.push_undo();
                let placed = scene.history_mark();
                let id = scene.add(Drawable::new(Shape::Text(text), style.clone()));
                self.state = DraftState::TextEditing { id, placed };
                log::debug!("Text {} placed at {:?}", id, point);
                DraftEvent::TextStarted(id)
            }
            _ => {
                let Some(kind) = tool.shape_kind() else {
                    return DraftEvent::Ignored;
                };
                if scene.topmost_at(point, 0.0).is_some() {
                    return DraftEvent::Ignored;
                }
                let preview = synth::synthesize(kind, point, point, style);
                self.state = DraftState::Drafting {
                    kind,
                    anchor: point,
                    preview,
                };
                log::debug!("Drafting {:?} from {:?}", kind, point);
                DraftEvent::Started
            }
        }
    }

    pub fn pointer_move(&mut self, point: Point) -> DraftEvent {
        match &mut self.state {
            DraftState::Drafting {
                kind,
                anchor,
                preview,
            } => {
                preview.shape = synth::shape_geometry(*kind, *anchor, point);
                DraftEvent::Updated
            }
            DraftState::FreehandDrawing { preview } => match &mut preview.shape {
                Shape::FreehandPath(path) => {
                    if path.add_point(point) {
                        DraftEvent::Updated
                    } else {
                        DraftEvent::Ignored
                    }
                }
                _ => DraftEvent::Ignored,
            },
            _ => DraftEvent::Ignored,
        }
    }

    /// Pointer released: commit the preview if it is large enough.
    pub fn pointer_up(&mut self, scene: &mut Scene, point: Point) -> DraftEvent {
        if !self.is_active() {
            return DraftEvent::Ignored;
        }
        self.pointer_move(point);
        let preview = match std::mem::take(&mut self.state) {
            DraftState::Drafting { preview, .. } | DraftState::FreehandDrawing { preview } => {
                preview
            }
            other => {
                self.state = other;
                return DraftEvent::Ignored;
            }
        };

        if !meets_minimum(&preview.shape, self.config.min_size) {
            log::debug!("Discarded undersized {} draft", preview.type_name());
            return DraftEvent::Discarded;
        }
        scene.push_undo();
        let id = scene.add(preview);
        log::debug!("Committed drawable {}", id);
        DraftEvent::Committed(id)
    }

    /// Replace the content of the text being edited.
    pub fn set_text(&mut self, scene: &mut Scene, content: &str) -> bool {
        let Some(id) = self.editing_text() else {
            return false;
        };
        match scene.get_mut(id).map(|d| &mut d.shape) {
            Some(Shape::Text(text)) => {
                text.content = content.to_string();
                true
            }
            _ => false,
        }
    }

    /// Finish text editing (blur / Enter / Escape).
    ///
    /// Blank text leaves the scene along with the undo step that created it.
    /// If other steps were recorded since, the removal becomes a step of its own.
    pub fn commit_text(&mut self, scene: &mut Scene) -> DraftEvent {
        let DraftState::TextEditing { id, placed } = self.state else {
            return DraftEvent::Ignored;
        };
        self.state = DraftState::Idle;
        let blank = match scene.get(id).and_then(Drawable::as_text) {
            Some(text) => text.is_blank(),
            // Removed behind our back (undo, import); nothing left to do.
            None => return DraftEvent::Ignored,
        };
        if blank {
            if !scene.withdraw_undo(placed) {
                scene.push_undo();
            }
            scene.remove(id);
            log::debug!("Removed empty text {}", id);
            DraftEvent::TextRemoved(id)
        } else {
            DraftEvent::TextKept(id)
        }
    }

    /// Abort the current gesture without touching the scene.
    ///
    /// Text editing is committed rather than dropped.
    pub fn cancel(&mut self, scene: &mut Scene) -> DraftEvent {
        match self.state {
            DraftState::Idle => DraftEvent::Ignored,
            DraftState::TextEditing { .. } => self.commit_text(scene),
            DraftState::Drafting { .. } | DraftState::FreehandDrawing { .. } => {
                self.state = DraftState::Idle;
                DraftEvent::Discarded
            }
        }
    }
}

/// Size check applied on pointer-up.
///
/// Area shapes need both dimensions at the minimum; lines and freehand
/// paths are measured by length.
fn meets_minimum(shape: &Shape, min_size: f64) -> bool {
    match shape {
        Shape::Line(line) => line.length() >= min_size,
        Shape::FreehandPath(path) => path.len() >= 2 && path.length() >= min_size,
        Shape::Text(_) => true,
        _ => {
            let bounds = shape.bounds();
            bounds.width() >= min_size && bounds.height() >= min_size
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Rectangle;

    fn controller() -> DraftController {
        DraftController::new(DraftConfig::default())
    }

    #[test]
    fn test_rectangle_drag_commits() {
        let mut scene = Scene::new();
        let mut draft = controller();
        let style = Style::default();

        let ev = draft.pointer_down(&mut scene, ToolKind::Rectangle, Point::new(50.0, 50.0), &style);
        assert_eq!(ev, DraftEvent::Started);
        assert!(draft.is_active());
        assert!(scene.is_empty());

        let preview_id = draft.preview().map(Drawable::id);
        draft.pointer_move(Point::new(30.0, 20.0));
        assert_eq!(draft.preview().map(Drawable::id), preview_id);
        assert!(scene.is_empty());

        let DraftEvent::Committed(id) = draft.pointer_up(&mut scene, Point::new(10.0, 10.0)) else {
            panic!("expected commit");
        };
        assert_eq!(Some(id), preview_id);
        assert_eq!(scene.len(), 1);
        assert!(scene.can_undo());
        let Some(Shape::Rectangle(r)) = scene.get(id).map(|d| &d.shape) else {
            panic!("expected rectangle");
        };
        assert_eq!((r.left, r.top, r.width, r.height), (10.0, 10.0, 40.0, 40.0));
        assert!(!draft.is_active());
    }

    #[test]
    fn test_tiny_drag_is_discarded() {
        let mut scene = Scene::new();
        let mut draft = controller();
        draft.pointer_down(&mut scene, ToolKind::Rectangle, Point::ZERO, &Style::default());
        draft.pointer_move(Point::new(1.0, 1.0));
        let ev = draft.pointer_up(&mut scene, Point::new(2.0, 2.0));
        assert_eq!(ev, DraftEvent::Discarded);
        assert!(scene.is_empty());
        assert!(!scene.can_undo());
    }

    #[test]
    fn test_thin_rectangle_is_discarded_but_flat_line_is_kept() {
        let mut scene = Scene::new();
        let mut draft = controller();
        let style = Style::default();

        draft.pointer_down(&mut scene, ToolKind::Rectangle, Point::ZERO, &style);
        assert_eq!(draft.pointer_up(&mut scene, Point::new(100.0, 3.0)), DraftEvent::Discarded);

        draft.pointer_down(&mut scene, ToolKind::Line, Point::ZERO, &style);
        assert!(matches!(
            draft.pointer_up(&mut scene, Point::new(100.0, 0.0)),
            DraftEvent::Committed(_)
        ));
    }

    #[test]
    fn test_press_on_existing_drawable_is_ignored() {
        let mut scene = Scene::new();
        let mut draft = controller();
        let style = Style::default();
        draft.pointer_down(&mut scene, ToolKind::Rectangle, Point::ZERO, &style);
        draft.pointer_up(&mut scene, Point::new(50.0, 50.0));

        let ev = draft.pointer_down(&mut scene, ToolKind::Ellipse, Point::new(25.0, 25.0), &style);
        assert_eq!(ev, DraftEvent::Ignored);
        assert!(!draft.is_active());
    }

    #[test]
    fn test_freehand_needs_two_points_and_length() {
        let mut scene = Scene::new();
        let mut draft = controller();
        let style = Style::default();

        draft.pointer_down(&mut scene, ToolKind::Draw, Point::ZERO, &style);
        assert_eq!(draft.pointer_up(&mut scene, Point::ZERO), DraftEvent::Discarded);

        draft.pointer_down(&mut scene, ToolKind::Draw, Point::ZERO, &style);
        draft.pointer_move(Point::new(10.0, 0.0));
        draft.pointer_move(Point::new(10.0, 0.0));
        draft.pointer_move(Point::new(10.0, 10.0));
        let DraftEvent::Committed(id) = draft.pointer_up(&mut scene, Point::new(10.0, 10.0)) else {
            panic!("expected commit");
        };
        let Some(Shape::FreehandPath(path)) = scene.get(id).map(|d| &d.shape) else {
            panic!("expected freehand path");
        };
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_text_lifecycle() {
        let mut scene = Scene::new();
        let mut draft = controller();
        let style = Style::default();

        let DraftEvent::TextStarted(id) =
            draft.pointer_down(&mut scene, ToolKind::Text, Point::new(5.0, 5.0), &style)
        else {
            panic!("expected text");
        };
        assert_eq!(
            scene.get(id).and_then(Drawable::as_text).map(|t| t.content.as_str()),
            Some("Double click to edit")
        );
        assert!(draft.set_text(&mut scene, "hello"));
        assert_eq!(draft.commit_text(&mut scene), DraftEvent::TextKept(id));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_blank_text_is_removed_without_undo_step() {
        let mut scene = Scene::new();
        let mut draft = controller();
        let DraftEvent::TextStarted(id) =
            draft.pointer_down(&mut scene, ToolKind::Text, Point::ZERO, &Style::default())
        else {
            panic!("expected text");
        };
        draft.set_text(&mut scene, "   ");
        // A press elsewhere blurs the editor.
        let ev = draft.pointer_down(&mut scene, ToolKind::Text, Point::new(300.0, 0.0), &Style::default());
        assert_eq!(ev, DraftEvent::TextRemoved(id));
        assert!(scene.is_empty());
        assert!(!scene.can_undo());
        assert!(draft.editing_text().is_none());
    }

    #[test]
    fn test_blank_text_keeps_later_undo_steps() {
        let mut scene = Scene::new();
        let mut draft = controller();
        draft.pointer_down(&mut scene, ToolKind::Text, Point::ZERO, &Style::default());
        draft.set_text(&mut scene, "");

        // Another edit lands while the text is still open.
        scene.push_undo();
        let rect = scene.add(Drawable::new(
            Shape::Rectangle(Rectangle::new(100.0, 100.0, 20.0, 20.0)),
            Style::default(),
        ));

        assert!(matches!(draft.commit_text(&mut scene), DraftEvent::TextRemoved(_)));
        assert_eq!(scene.ids(), vec![rect]);

        assert!(scene.undo());
        assert_eq!(scene.len(), 2);
        assert!(scene.undo());
        assert_eq!(scene.len(), 1);
        assert!(!scene.contains(rect));
        assert!(scene.undo());
        assert!(scene.is_empty());
        assert!(!scene.can_undo());
    }

    #[test]
    fn test_cancel_discards_preview() {
        let mut scene = Scene::new();
        let mut draft = controller();
        draft.pointer_down(&mut scene, ToolKind::Star, Point::ZERO, &Style::default());
        draft.pointer_move(Point::new(80.0, 80.0));
        assert_eq!(draft.cancel(&mut scene), DraftEvent::Discarded);
        assert!(draft.preview().is_none());
        assert_eq!(draft.pointer_up(&mut scene, Point::new(80.0, 80.0)), DraftEvent::Ignored);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_non_drawing_tools_are_ignored() {
        let mut scene = Scene::new();
        let mut draft = controller();
        for tool in [ToolKind::Select, ToolKind::Eraser] {
            assert_eq!(
                draft.pointer_down(&mut scene, tool, Point::ZERO, &Style::default()),
                DraftEvent::Ignored
            );
        }
    }
}
