//! Ordered drawable collection with undo history.

use crate::shapes::{Drawable, DrawableId, GroupId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Maximum number of undo states to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// Current scene document version.
pub const SCENE_VERSION: u32 = 1;

fn default_version() -> u32 {
    SCENE_VERSION
}

/// The ordered collection of drawables.
///
/// List order is paint order: index 0 is the bottom of the stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Document format version.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Drawables, back to front.
    #[serde(rename = "objects")]
    drawables: Vec<Drawable>,
    /// Undo history stack.
    #[serde(skip)]
    undo_stack: Vec<Vec<Drawable>>,
    /// Redo history stack.
    #[serde(skip)]
    redo_stack: Vec<Vec<Drawable>>,
    /// Bumped on every mutation.
    #[serde(skip)]
    revision: u64,
    /// Bumped whenever the undo stack changes.
    #[serde(skip)]
    history: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Scene {
    fn eq(&self, other: &Self) -> bool {
        self.drawables == other.drawables
    }
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            version: SCENE_VERSION,
            drawables: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            revision: 0,
            history: 0,
        }
    }

    /// Monotonic mutation counter for dirty tracking.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Identifies the current top of the undo stack.
    pub(crate) fn history_mark(&self) -> u64 {
        self.history
    }

    fn touch_history(&mut self) {
        self.history = self.history.wrapping_add(1);
    }

    pub(crate) fn snapshot(&self) -> Vec<Drawable> {
        self.drawables.clone()
    }

    /// Push a previously captured state as one undo step.
    pub(crate) fn push_snapshot(&mut self, snapshot: Vec<Drawable>) {
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
        self.touch_history();
    }

    /// Push current state to undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.push_snapshot(snapshot);
    }

    /// Drop the most recent undo step without restoring it, provided the
    /// stack has not changed since `mark` was taken.
    pub(crate) fn withdraw_undo(&mut self, mark: u64) -> bool {
        if self.history != mark || self.undo_stack.pop().is_none() {
            return false;
        }
        self.touch_history();
        true
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.drawables, snapshot);
        self.redo_stack.push(current);
        self.touch();
        self.touch_history();
        true
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.drawables, snapshot);
        self.undo_stack.push(current);
        self.touch();
        self.touch_history();
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Give `drawable` a fresh id if one already in the scene uses it.
    fn ensure_unique(&self, drawable: &mut Drawable) {
        if self.contains(drawable.id()) {
            let old = drawable.id();
            drawable.regenerate_id();
            log::warn!("Duplicate drawable id {}, reassigned to {}", old, drawable.id());
        }
    }

    /// Append a drawable on top and return its (possibly reassigned) id.
    pub fn add(&mut self, mut drawable: Drawable) -> DrawableId {
        self.ensure_unique(&mut drawable);
        let id = drawable.id();
        self.drawables.push(drawable);
        self.touch();
        id
    }

    /// Append several drawables on top, in order.
    pub fn extend(&mut self, drawables: impl IntoIterator<Item = Drawable>) -> Vec<DrawableId> {
        drawables.into_iter().map(|d| self.add(d)).collect()
    }

    /// Remove a drawable from the scene.
    pub fn remove(&mut self, id: DrawableId) -> Option<Drawable> {
        let index = self.index_of(id)?;
        self.touch();
        Some(self.drawables.remove(index))
    }

    /// Replace one drawable with zero or more drawables at the same z-position.
    ///
    /// Returns the ids of the inserted drawables, or `None` if `id` is absent.
    pub fn replace(
        &mut self,
        id: DrawableId,
        replacements: Vec<Drawable>,
    ) -> Option<Vec<DrawableId>> {
        let index = self.index_of(id)?;
        self.drawables.remove(index);
        let mut ids = Vec::with_capacity(replacements.len());
        for (offset, mut drawable) in replacements.into_iter().enumerate() {
            self.ensure_unique(&mut drawable);
            ids.push(drawable.id());
            self.drawables.insert(index + offset, drawable);
        }
        self.touch();
        Some(ids)
    }

    /// Replace the whole content, keeping history.
    pub fn replace_all(&mut self, drawables: Vec<Drawable>) -> Vec<DrawableId> {
        self.drawables.clear();
        self.extend(drawables)
    }

    /// Clear all drawables from the scene.
    pub fn clear(&mut self) {
        self.drawables.clear();
        self.touch();
    }

    pub fn get(&self, id: DrawableId) -> Option<&Drawable> {
        self.drawables.iter().find(|d| d.id() == id)
    }

    /// Mutable access; counts as a mutation for dirty tracking.
    pub fn get_mut(&mut self, id: DrawableId) -> Option<&mut Drawable> {
        let index = self.index_of(id)?;
        self.touch();
        self.drawables.get_mut(index)
    }

    pub fn contains(&self, id: DrawableId) -> bool {
        self.index_of(id).is_some()
    }

    /// Position in the paint order (0 = bottom).
    pub fn index_of(&self, id: DrawableId) -> Option<usize> {
        self.drawables.iter().position(|d| d.id() == id)
    }

    /// Drawables in paint order (back to front).
    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    pub fn iter(&self) -> impl Iterator<Item = &Drawable> {
        self.drawables.iter()
    }

    pub fn ids(&self) -> Vec<DrawableId> {
        self.drawables.iter().map(Drawable::id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    /// Bring a drawable to the front (topmost).
    pub fn bring_to_front(&mut self, id: DrawableId) -> bool {
        match self.index_of(id) {
            Some(index) if index + 1 < self.drawables.len() => {
                let drawable = self.drawables.remove(index);
                self.drawables.push(drawable);
                self.touch();
                true
            }
            _ => false,
        }
    }

    /// Move a drawable one layer forward (towards front).
    /// Returns true if it was moved, false if already at front.
    pub fn bring_forward(&mut self, id: DrawableId) -> bool {
        match self.index_of(id) {
            Some(index) if index + 1 < self.drawables.len() => {
                self.drawables.swap(index, index + 1);
                self.touch();
                true
            }
            _ => false,
        }
    }

    /// Move a drawable one layer backward (towards back).
    /// Returns true if it was moved, false if already at back.
    pub fn send_backward(&mut self, id: DrawableId) -> bool {
        match self.index_of(id) {
            Some(index) if index > 0 => {
                self.drawables.swap(index, index - 1);
                self.touch();
                true
            }
            _ => false,
        }
    }

    /// Drawables whose bounds contain `point`, front to back.
    pub fn ids_at(&self, point: Point, tolerance: f64) -> Vec<DrawableId> {
        self.drawables
            .iter()
            .rev()
            .filter(|d| d.hit_test(point, tolerance))
            .map(Drawable::id)
            .collect()
    }

    /// The topmost drawable at `point`.
    pub fn topmost_at(&self, point: Point, tolerance: f64) -> Option<DrawableId> {
        self.drawables
            .iter()
            .rev()
            .find(|d| d.hit_test(point, tolerance))
            .map(Drawable::id)
    }

    /// Bounding box of all drawables.
    pub fn bounds(&self) -> Option<Rect> {
        self.drawables
            .iter()
            .map(Drawable::bounds)
            .reduce(|acc, b| acc.union(b))
    }

    /// Put the given drawables into a fresh group.
    ///
    /// Needs at least two existing drawables.
    pub fn group(&mut self, ids: &[DrawableId]) -> Option<GroupId> {
        let members: HashSet<DrawableId> = ids.iter().copied().filter(|id| self.contains(*id)).collect();
        if members.len() < 2 {
            return None;
        }
        let group = Uuid::new_v4();
        for drawable in &mut self.drawables {
            if members.contains(&drawable.id()) {
                drawable.group = Some(group);
            }
        }
        self.touch();
        Some(group)
    }

    /// Dissolve a group. Returns false if no drawable belonged to it.
    pub fn ungroup(&mut self, group: GroupId) -> bool {
        let mut changed = false;
        for drawable in &mut self.drawables {
            if drawable.group == Some(group) {
                drawable.group = None;
                changed = true;
            }
        }
        if changed {
            self.touch();
        }
        changed
    }

    /// Members of a group in paint order.
    pub fn members(&self, group: GroupId) -> Vec<DrawableId> {
        self.drawables
            .iter()
            .filter(|d| d.group() == Some(group))
            .map(Drawable::id)
            .collect()
    }

    /// Serialize the scene document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a scene document from JSON.
    ///
    /// Strict: any malformed record fails the whole document. Use
    /// [`crate::import`] for lenient loading.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let parsed: Scene = serde_json::from_str(json)?;
        let mut scene = Scene::new();
        scene.version = parsed.version;
        scene.extend(parsed.drawables);
        scene.revision = 0;
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Line, Rectangle, Shape, Style};

    fn rect(left: f64, top: f64, size: f64) -> Drawable {
        Drawable::new(
            Shape::Rectangle(Rectangle::new(left, top, size, size)),
            Style::default(),
        )
    }

    fn ids(scene: &Scene) -> Vec<DrawableId> {
        scene.ids()
    }

    #[test]
    fn test_add_and_remove() {
        let mut scene = Scene::new();
        let a = scene.add(rect(0.0, 0.0, 10.0));
        let b = scene.add(rect(5.0, 5.0, 10.0));
        assert_eq!(ids(&scene), vec![a, b]);
        assert!(scene.remove(a).is_some());
        assert!(scene.remove(a).is_none());
        assert_eq!(ids(&scene), vec![b]);
    }

    #[test]
    fn test_duplicate_id_is_reassigned() {
        let mut scene = Scene::new();
        let original = rect(0.0, 0.0, 10.0);
        let a = scene.add(original.clone());
        let b = scene.add(original);
        assert_ne!(a, b);
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_reorder_boundaries() {
        let mut scene = Scene::new();
        let a = scene.add(rect(0.0, 0.0, 10.0));
        let b = scene.add(rect(0.0, 0.0, 10.0));
        let c = scene.add(rect(0.0, 0.0, 10.0));

        assert!(!scene.bring_forward(c));
        assert!(!scene.send_backward(a));
        assert!(scene.bring_forward(a));
        assert_eq!(ids(&scene), vec![b, a, c]);
        assert!(scene.send_backward(c));
        assert_eq!(ids(&scene), vec![b, c, a]);
        assert!(scene.bring_to_front(b));
        assert_eq!(ids(&scene), vec![c, a, b]);
    }

    #[test]
    fn test_replace_keeps_z_position() {
        let mut scene = Scene::new();
        let a = scene.add(rect(0.0, 0.0, 10.0));
        let b = scene.add(rect(0.0, 0.0, 10.0));
        let c = scene.add(rect(0.0, 0.0, 10.0));
        let pieces = vec![
            Drawable::new(
                Shape::Line(Line::new(Point::ZERO, Point::new(10.0, 0.0))),
                Style::default(),
            ),
            Drawable::new(
                Shape::Line(Line::new(Point::new(20.0, 0.0), Point::new(30.0, 0.0))),
                Style::default(),
            ),
        ];
        let new_ids = scene.replace(b, pieces).unwrap();
        assert_eq!(new_ids.len(), 2);
        assert_eq!(ids(&scene), vec![a, new_ids[0], new_ids[1], c]);
        assert!(scene.replace(b, Vec::new()).is_none());
    }

    #[test]
    fn test_hit_order_is_front_to_back() {
        let mut scene = Scene::new();
        let a = scene.add(rect(0.0, 0.0, 100.0));
        let b = scene.add(rect(50.0, 50.0, 100.0));
        assert_eq!(scene.ids_at(Point::new(75.0, 75.0), 0.0), vec![b, a]);
        assert_eq!(scene.topmost_at(Point::new(10.0, 10.0), 0.0), Some(a));
        assert_eq!(scene.topmost_at(Point::new(500.0, 500.0), 0.0), None);
    }

    #[test]
    fn test_undo_redo() {
        let mut scene = Scene::new();
        assert!(!scene.undo());

        scene.push_undo();
        let a = scene.add(rect(0.0, 0.0, 10.0));
        scene.push_undo();
        scene.add(rect(0.0, 0.0, 10.0));

        assert!(scene.undo());
        assert_eq!(ids(&scene), vec![a]);
        assert!(scene.undo());
        assert!(scene.is_empty());
        assert!(!scene.can_undo());

        assert!(scene.redo());
        assert_eq!(ids(&scene), vec![a]);

        scene.push_undo();
        scene.clear();
        assert!(!scene.can_redo());
    }

    #[test]
    fn test_undo_history_is_bounded() {
        let mut scene = Scene::new();
        for _ in 0..(MAX_UNDO_HISTORY + 10) {
            scene.push_undo();
            scene.add(rect(0.0, 0.0, 10.0));
        }
        let mut steps = 0;
        while scene.undo() {
            steps += 1;
        }
        assert_eq!(steps, MAX_UNDO_HISTORY);
        assert_eq!(scene.len(), 10);
    }

    #[test]
    fn test_revision_tracks_mutations() {
        let mut scene = Scene::new();
        let start = scene.revision();
        let a = scene.add(rect(0.0, 0.0, 10.0));
        assert!(scene.revision() > start);
        let before = scene.revision();
        assert!(!scene.bring_forward(a));
        assert_eq!(scene.revision(), before);
    }

    #[test]
    fn test_group_and_ungroup() {
        let mut scene = Scene::new();
        let a = scene.add(rect(0.0, 0.0, 10.0));
        let b = scene.add(rect(0.0, 0.0, 10.0));
        let c = scene.add(rect(0.0, 0.0, 10.0));

        assert!(scene.group(&[a]).is_none());
        let group = scene.group(&[a, c]).unwrap();
        assert_eq!(scene.members(group), vec![a, c]);
        assert_eq!(scene.get(b).and_then(Drawable::group), None);

        assert!(scene.ungroup(group));
        assert!(scene.members(group).is_empty());
        assert!(!scene.ungroup(group));
    }

    #[test]
    fn test_json_document_shape() {
        let mut scene = Scene::new();
        scene.add(rect(1.0, 2.0, 3.0));
        let json = scene.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["objects"][0]["type"], "rectangle");

        let restored = Scene::from_json(&json).unwrap();
        assert_eq!(restored, scene);
    }
}
