//! Canvas: routes input to the drafting, eraser and selection controllers
//! and owns the scene they mutate.

use crate::config::EngineConfig;
use crate::eraser::{EraseReport, EraserEngine, EraserStroke};
use crate::import::{ImportBatch, ImportError, ImportMode, ImportReport, ImportSender};
use crate::input::{KeyEvent, Modifiers, PointerEvent};
use crate::scene::Scene;
use crate::selection::SelectionController;
use crate::shapes::{Drawable, DrawableId, Shape, Style, Text};
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use crate::synth;
use crate::tools::{DraftController, DraftEvent, ToolKind, next_tool};
use kurbo::Point;
use std::collections::VecDeque;
use std::sync::mpsc;

/// What happened to an import handed to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Applied(ImportReport),
    /// Queued until the current gesture ends.
    Deferred,
    /// No scene attached.
    Ignored,
}

/// Scene state captured when an eraser stroke starts.
#[derive(Debug)]
struct EraseCheckpoint {
    revision: u64,
    snapshot: Vec<Drawable>,
}

/// The interactive drawing surface.
///
/// All entry points are no-ops while no scene is attached.
#[derive(Debug)]
pub struct Canvas {
    scene: Option<Scene>,
    config: EngineConfig,
    tool: ToolKind,
    style: Style,
    draft: DraftController,
    eraser: EraserEngine,
    selection: SelectionController,
    erase_checkpoint: Option<EraseCheckpoint>,
    import_tx: mpsc::Sender<ImportBatch>,
    import_rx: mpsc::Receiver<ImportBatch>,
    pending_imports: VecDeque<ImportBatch>,
    /// Set by preview-only changes the scene revision does not see.
    dirty: bool,
    seen_revision: u64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a canvas with an empty scene and default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let (import_tx, import_rx) = mpsc::channel();
        Self {
            scene: Some(Scene::new()),
            tool: ToolKind::default(),
            style: Style::default(),
            draft: DraftController::new(config.draft.clone()),
            eraser: EraserEngine::new(config.eraser.clone()),
            selection: SelectionController::new(config.selection.clone()),
            erase_checkpoint: None,
            import_tx,
            import_rx,
            pending_imports: VecDeque::new(),
            dirty: true,
            seen_revision: 0,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Attach a scene, replacing (and returning) the current one.
    pub fn attach_scene(&mut self, scene: Scene) -> Option<Scene> {
        self.reset_interaction();
        self.dirty = true;
        self.scene.replace(scene)
    }

    /// Detach the scene; the canvas ignores input until one is attached.
    pub fn detach_scene(&mut self) -> Option<Scene> {
        self.reset_interaction();
        self.dirty = true;
        self.scene.take()
    }

    fn reset_interaction(&mut self) {
        self.draft = DraftController::new(self.config.draft.clone());
        self.eraser.end();
        self.erase_checkpoint = None;
        self.selection.clear();
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Switch tools, ending any gesture in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.cancel_gesture();
        if self.tool != tool {
            log::debug!("Tool {:?} -> {:?}", self.tool, tool);
            self.tool = tool;
        }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Style for drawables created from now on.
    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn set_eraser_radius(&mut self, radius: f64) {
        self.eraser.set_radius(radius);
        self.config.eraser.radius = self.eraser.config().radius;
    }

    /// Live draft preview, drawn on top of the scene.
    pub fn preview(&self) -> Option<&Drawable> {
        self.draft.preview()
    }

    /// Eraser trail of the stroke in progress.
    pub fn eraser_stroke(&self) -> Option<&EraserStroke> {
        self.eraser.stroke()
    }

    pub fn selected(&self) -> &[DrawableId] {
        self.selection.selected()
    }

    pub fn editing_text(&self) -> Option<DrawableId> {
        self.draft.editing_text()
    }

    /// True while a pointer gesture is open (shape drag, freehand or eraser stroke).
    pub fn gesture_active(&self) -> bool {
        self.draft.is_active() || self.eraser.is_active()
    }

    /// Selection edits wait for the open gesture or text edit to finish.
    fn edits_blocked(&self) -> bool {
        self.gesture_active() || self.draft.editing_text().is_some()
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                modifiers,
            } => self.pointer_down(position, modifiers),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position } => self.pointer_up(position),
        }
    }

    pub fn pointer_down(&mut self, point: Point, modifiers: Modifiers) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };

        if self.draft.editing_text().is_some() {
            let event = self.draft.pointer_down(scene, self.tool, point, &self.style);
            self.after_draft(event);
            return;
        }

        match self.tool {
            ToolKind::Select => {
                self.selection.click(scene, point, modifiers);
            }
            ToolKind::Eraser => {
                self.erase_checkpoint = Some(EraseCheckpoint {
                    revision: scene.revision(),
                    snapshot: scene.snapshot(),
                });
                self.eraser.begin(point);
                self.dirty = true;
            }
            tool => {
                let event = self.draft.pointer_down(scene, tool, point, &self.style);
                if event == DraftEvent::Ignored && tool.shape_kind().is_some() {
                    // Clicks on existing drawables fall through to selection.
                    self.selection.click(scene, point, modifiers);
                }
                self.after_draft(event);
            }
        }
    }

    pub fn pointer_move(&mut self, point: Point) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        if self.eraser.is_active() {
            let report = self.eraser.extend(point, scene);
            self.after_erase(&report);
            self.dirty = true;
        } else if self.draft.is_active() {
            let event = self.draft.pointer_move(point);
            self.after_draft(event);
        }
    }

    /// Pointer released, possibly outside the canvas. Ends the gesture and
    /// applies imports that arrived while it was open.
    pub fn pointer_up(&mut self, point: Point) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        if self.eraser.is_active() {
            let last = self.eraser.stroke().and_then(|s| s.points.last().copied());
            if last != Some(point) {
                let report = self.eraser.extend(point, scene);
                self.after_erase(&report);
            }
            self.finish_erase();
        } else if self.draft.is_active() {
            let event = self.draft.pointer_up(scene, point);
            self.after_draft(event);
        }
        self.flush_pending_imports();
    }

    fn after_draft(&mut self, event: DraftEvent) {
        match event {
            DraftEvent::Ignored => return,
            DraftEvent::Committed(id) | DraftEvent::TextStarted(id) => self.selection.set([id]),
            DraftEvent::TextRemoved(_) => {
                if let Some(scene) = self.scene.as_ref() {
                    self.selection.retain_existing(scene);
                }
            }
            _ => {}
        }
        self.dirty = true;
        let next = next_tool(self.tool, &event, &self.config.draft);
        if next != self.tool {
            log::debug!("Tool {:?} -> {:?} after {:?}", self.tool, next, event);
            self.tool = next;
        }
    }

    fn after_erase(&mut self, report: &EraseReport) {
        if report.is_empty() {
            return;
        }
        if let Some(scene) = self.scene.as_ref() {
            self.selection.retain_existing(scene);
        }
    }

    /// Close the eraser stroke; a stroke that changed anything becomes one undo step.
    fn finish_erase(&mut self) {
        self.eraser.end();
        self.dirty = true;
        let (Some(scene), Some(checkpoint)) = (self.scene.as_mut(), self.erase_checkpoint.take())
        else {
            return;
        };
        if scene.revision() != checkpoint.revision {
            scene.push_snapshot(checkpoint.snapshot);
        }
    }

    /// End whatever gesture is open without committing a draft.
    /// Text editing is committed.
    pub fn cancel_gesture(&mut self) {
        if self.eraser.is_active() {
            self.finish_erase();
        }
        if let Some(scene) = self.scene.as_mut() {
            let event = self.draft.cancel(scene);
            if event != DraftEvent::Ignored {
                self.dirty = true;
                if let DraftEvent::TextRemoved(_) = event {
                    self.selection.retain_existing(scene);
                }
            }
        }
        self.flush_pending_imports();
    }

    /// Replace the content of the text being edited.
    pub fn set_text(&mut self, content: &str) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        self.draft.set_text(scene, content)
    }

    /// Finish text editing (blur / Enter).
    pub fn commit_text(&mut self) -> Option<DraftEvent> {
        let scene = self.scene.as_mut()?;
        let event = self.draft.commit_text(scene);
        self.after_draft(event);
        Some(event)
    }

    /// Handle a key press. Returns true if it triggered anything.
    ///
    /// While a text is being edited keys belong to the text editor; only
    /// Escape is handled here, and it commits the text.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if self.scene.is_none() {
            return false;
        }
        if self.draft.editing_text().is_some() {
            if event.key == "Escape" {
                self.commit_text();
                return true;
            }
            return false;
        }
        let Some(action) = ShortcutRegistry::resolve(&event.key, event.modifiers) else {
            return false;
        };
        log::debug!("Shortcut {:?} -> {:?}", event.key, action);
        self.apply_action(action)
    }

    fn apply_action(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Cancel => {
                self.cancel_gesture();
                self.selection.clear();
                self.dirty = true;
                true
            }
            ShortcutAction::SetTool(tool) => {
                self.set_tool(tool);
                true
            }
            ShortcutAction::DeleteSelection => self.delete_selected() > 0,
            ShortcutAction::BringForward => self.bring_forward(),
            ShortcutAction::SendBackward => self.send_backward(),
            ShortcutAction::SelectAll => {
                let Some(scene) = self.scene.as_ref() else {
                    return false;
                };
                self.selection.select_all(scene);
                self.dirty = true;
                true
            }
            ShortcutAction::Group => self.group_selected(),
            ShortcutAction::Ungroup => self.ungroup_selected(),
        }
    }

    /// Remove the selected drawables; returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        if self.edits_blocked() {
            return 0;
        }
        let Some(scene) = self.scene.as_mut() else {
            return 0;
        };
        self.selection.delete_selected(scene).len()
    }

    pub fn bring_forward(&mut self) -> bool {
        if self.edits_blocked() {
            return false;
        }
        match self.scene.as_mut() {
            Some(scene) => self.selection.bring_forward(scene),
            None => false,
        }
    }

    pub fn send_backward(&mut self) -> bool {
        if self.edits_blocked() {
            return false;
        }
        match self.scene.as_mut() {
            Some(scene) => self.selection.send_backward(scene),
            None => false,
        }
    }

    /// Group the selected drawables as one undo step.
    pub fn group_selected(&mut self) -> bool {
        if self.edits_blocked() {
            return false;
        }
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let before = scene.snapshot();
        match scene.group(self.selection.selected()) {
            Some(group) => {
                scene.push_snapshot(before);
                let members = scene.members(group);
                self.selection.set(members);
                true
            }
            None => false,
        }
    }

    /// Dissolve every group touched by the selection.
    pub fn ungroup_selected(&mut self) -> bool {
        if self.edits_blocked() {
            return false;
        }
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let mut groups: Vec<_> = self
            .selection
            .selected()
            .iter()
            .filter_map(|id| scene.get(*id).and_then(Drawable::group))
            .collect();
        groups.dedup();
        if groups.is_empty() {
            return false;
        }
        scene.push_undo();
        for group in groups {
            scene.ungroup(group);
        }
        true
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let changed = scene.undo();
        if changed {
            self.selection.retain_existing(scene);
            log::debug!("Undo");
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let changed = scene.redo();
        if changed {
            self.selection.retain_existing(scene);
            log::debug!("Redo");
        }
        changed
    }

    /// Remove every drawable (undoable). Returns false if already empty.
    pub fn clear(&mut self) -> bool {
        self.cancel_gesture();
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        if scene.is_empty() {
            return false;
        }
        scene.push_undo();
        scene.clear();
        self.selection.clear();
        log::info!("Canvas cleared");
        true
    }

    /// Toolbar quick insert: drop a default-size drawable centered on `center`
    /// and return to the select tool.
    pub fn place_shape(&mut self, tool: ToolKind, center: Point) -> Option<DrawableId> {
        self.cancel_gesture();
        let scene = self.scene.as_mut()?;
        let drawable = match tool {
            ToolKind::Text => {
                let mut text = Text::new(center, self.config.draft.text_placeholder.clone());
                text.font_size = self.config.draft.font_size;
                Drawable::new(Shape::Text(text), self.style.clone())
            }
            other => synth::default_shape(other.shape_kind()?, center, &self.style),
        };
        scene.push_undo();
        let id = scene.add(drawable);
        self.selection.set([id]);
        self.tool = ToolKind::Select;
        log::debug!("Placed {:?} {} at {:?}", tool, id, center);
        Some(id)
    }

    /// Validate and apply (or defer) a JSON import.
    pub fn import_str(&mut self, json: &str, mode: ImportMode) -> Result<ImportOutcome, ImportError> {
        let batch = ImportBatch::parse(json, mode)?;
        Ok(self.import(batch))
    }

    /// Apply a validated import now, or queue it if a gesture is open.
    pub fn import(&mut self, batch: ImportBatch) -> ImportOutcome {
        if self.scene.is_none() {
            return ImportOutcome::Ignored;
        }
        if self.gesture_active() {
            log::debug!("Deferring import until the current gesture ends");
            self.pending_imports.push_back(batch);
            return ImportOutcome::Deferred;
        }
        match self.apply_import(batch) {
            Some(report) => ImportOutcome::Applied(report),
            None => ImportOutcome::Ignored,
        }
    }

    fn apply_import(&mut self, batch: ImportBatch) -> Option<ImportReport> {
        if self.draft.editing_text().is_some() {
            self.commit_text();
        }
        let scene = self.scene.as_mut()?;
        let report = batch.apply(scene);
        self.selection.retain_existing(scene);
        Some(report)
    }

    fn flush_pending_imports(&mut self) {
        if self.gesture_active() {
            return;
        }
        while let Some(batch) = self.pending_imports.pop_front() {
            if self.apply_import(batch).is_none() {
                break;
            }
        }
    }

    /// Handle for submitting imports from other threads.
    pub fn import_sender(&self) -> ImportSender {
        ImportSender::new(self.import_tx.clone())
    }

    /// Drain the import inbox. Returns reports for the imports applied now;
    /// imports arriving during a gesture wait for its pointer-up.
    pub fn poll_imports(&mut self) -> Vec<ImportReport> {
        let mut applied = Vec::new();
        while let Ok(batch) = self.import_rx.try_recv() {
            self.pending_imports.push_back(batch);
        }
        if self.gesture_active() || self.scene.is_none() {
            return applied;
        }
        while let Some(batch) = self.pending_imports.pop_front() {
            match self.apply_import(batch) {
                Some(report) => applied.push(report),
                None => break,
            }
        }
        applied
    }

    /// Number of imports waiting for the current gesture to end.
    pub fn pending_imports(&self) -> usize {
        self.pending_imports.len()
    }

    /// Serialize the scene document, if a scene is attached.
    pub fn export_json(&self) -> Result<Option<String>, serde_json::Error> {
        self.scene.as_ref().map(Scene::to_json).transpose()
    }

    /// True once after anything visible changed; the renderer polls this.
    pub fn take_dirty(&mut self) -> bool {
        let revision = self.scene.as_ref().map(Scene::revision).unwrap_or(0);
        let dirty = self.dirty || revision != self.seen_revision;
        self.dirty = false;
        self.seen_revision = revision;
        dirty
    }
}
