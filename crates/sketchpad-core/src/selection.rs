//! Selection and z-order control.

use crate::config::SelectionConfig;
use crate::input::Modifiers;
use crate::scene::Scene;
use crate::shapes::{Drawable, DrawableId};
use kurbo::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Forward,
    Backward,
}

/// Alternate-click cycling state for a stack of overlapping drawables.
#[derive(Debug, Clone)]
struct ClickCycle {
    anchor: Point,
    /// Drawables under the anchor, front to back, captured on the first click.
    candidates: Vec<DrawableId>,
    index: usize,
}

/// Tracks selected drawables and applies reorder operations to them.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selected: Vec<DrawableId>,
    cycle: Option<ClickCycle>,
    config: SelectionConfig,
}

impl SelectionController {
    pub fn new(config: SelectionConfig) -> Self {
        Self {
            selected: Vec::new(),
            cycle: None,
            config,
        }
    }

    /// Currently selected ids, in selection order.
    pub fn selected(&self) -> &[DrawableId] {
        &self.selected
    }

    pub fn is_selected(&self, id: DrawableId) -> bool {
        self.selected.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Handle a selection click at `point`.
    ///
    /// Plain clicks pick the topmost drawable. With Alt held, repeated clicks
    /// at the same spot walk down through every drawable under it and wrap
    /// around. Shift adds to the current selection.
    pub fn click(&mut self, scene: &mut Scene, point: Point, modifiers: Modifiers) -> Option<DrawableId> {
        let target = if modifiers.alt {
            self.cycle_target(scene, point)
        } else {
            self.cycle = None;
            scene.topmost_at(point, 0.0)
        };

        let Some(id) = target else {
            if !modifiers.shift {
                self.selected.clear();
            }
            return None;
        };
        if !modifiers.shift {
            self.selected.clear();
        }
        self.select(scene, id);
        Some(id)
    }

    fn cycle_target(&mut self, scene: &Scene, point: Point) -> Option<DrawableId> {
        let tolerance = self.config.cycle_tolerance;
        if let Some(cycle) = &mut self.cycle {
            if cycle.anchor.distance(point) <= tolerance {
                cycle.candidates.retain(|id| scene.contains(*id));
                if !cycle.candidates.is_empty() {
                    cycle.index = (cycle.index + 1) % cycle.candidates.len();
                    return cycle.candidates.get(cycle.index).copied();
                }
            }
        }

        let candidates = scene.ids_at(point, 0.0);
        let first = candidates.first().copied();
        self.cycle = first.map(|_| ClickCycle {
            anchor: point,
            candidates,
            index: 0,
        });
        first
    }

    /// Add a drawable (or its whole group) to the selection.
    ///
    /// Ungrouped drawables are brought to the front.
    pub fn select(&mut self, scene: &mut Scene, id: DrawableId) {
        let Some(drawable) = scene.get(id) else {
            return;
        };
        match drawable.group() {
            Some(group) => {
                for member in scene.members(group) {
                    self.push(member);
                }
            }
            None => {
                scene.bring_to_front(id);
                self.push(id);
            }
        }
    }

    /// Replace the selection without touching the stacking order.
    pub fn set(&mut self, ids: impl IntoIterator<Item = DrawableId>) {
        self.selected.clear();
        for id in ids {
            self.push(id);
        }
    }

    fn push(&mut self, id: DrawableId) {
        if !self.selected.contains(&id) {
            self.selected.push(id);
        }
    }

    pub fn select_all(&mut self, scene: &Scene) {
        self.set(scene.iter().map(Drawable::id));
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.cycle = None;
    }

    /// Drop ids that are no longer in the scene (after erase, undo, import).
    pub fn retain_existing(&mut self, scene: &Scene) {
        self.selected.retain(|id| scene.contains(*id));
    }

    /// Swap each selected drawable with its upper neighbor.
    /// Returns true if anything moved.
    pub fn bring_forward(&self, scene: &mut Scene) -> bool {
        self.reorder(scene, Step::Forward)
    }

    /// Swap each selected drawable with its lower neighbor.
    /// Returns true if anything moved.
    pub fn send_backward(&self, scene: &mut Scene) -> bool {
        self.reorder(scene, Step::Backward)
    }

    /// Selected ids sorted bottom to top.
    fn ordered(&self, scene: &Scene) -> Vec<DrawableId> {
        let mut ordered: Vec<(usize, DrawableId)> = self
            .selected
            .iter()
            .filter_map(|&id| scene.index_of(id).map(|index| (index, id)))
            .collect();
        ordered.sort_by_key(|(index, _)| *index);
        ordered.into_iter().map(|(_, id)| id).collect()
    }

    /// Apply one reorder step to every selected drawable as a single undo step.
    ///
    /// Selected neighbors move as a block instead of trading places.
    fn reorder(&self, scene: &mut Scene, step: Step) -> bool {
        let mut ids = self.ordered(scene);
        if step == Step::Forward {
            ids.reverse();
        }
        let before = scene.snapshot();
        let mut moved = false;
        for id in ids {
            let Some(index) = scene.index_of(id) else {
                continue;
            };
            let neighbor = match step {
                Step::Forward => index.checked_add(1),
                Step::Backward => index.checked_sub(1),
            }
            .and_then(|i| scene.drawables().get(i));
            if neighbor.is_some_and(|d| self.is_selected(d.id())) {
                continue;
            }
            moved |= match step {
                Step::Forward => scene.bring_forward(id),
                Step::Backward => scene.send_backward(id),
            };
        }
        if moved {
            scene.push_snapshot(before);
        }
        moved
    }

    /// Remove all selected drawables as one undo step.
    pub fn delete_selected(&mut self, scene: &mut Scene) -> Vec<Drawable> {
        let present: Vec<DrawableId> = self
            .selected
            .iter()
            .copied()
            .filter(|id| scene.contains(*id))
            .collect();
        self.selected.clear();
        if present.is_empty() {
            return Vec::new();
        }
        scene.push_undo();
        let removed: Vec<Drawable> = present.into_iter().filter_map(|id| scene.remove(id)).collect();
        log::debug!("Deleted {} drawable(s)", removed.len());
        removed
    }
}
