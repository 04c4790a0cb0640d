//! Keyboard shortcut registry.

use crate::input::Modifiers;
use crate::tools::ToolKind;

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    DeleteSelection,
    BringForward,
    SendBackward,
    Undo,
    Redo,
    SelectAll,
    Group,
    Ungroup,
    Cancel,
    SetTool(ToolKind),
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        action: ShortcutAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Letter keys match either case; Ctrl also matches Cmd.
    pub fn matches(&self, key: &str, modifiers: Modifiers) -> bool {
        self.key.eq_ignore_ascii_case(key)
            && self.ctrl == modifiers.command()
            && self.shift == modifiers.shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use ShortcutAction::*;
        vec![
            Shortcut::new("Delete", false, false, DeleteSelection, "Delete selected drawables"),
            Shortcut::new("Backspace", false, false, DeleteSelection, "Delete selected drawables"),
            Shortcut::new("]", false, false, BringForward, "Bring forward"),
            Shortcut::new("[", false, false, SendBackward, "Send backward"),
            Shortcut::new("Z", true, false, Undo, "Undo"),
            Shortcut::new("Z", true, true, Redo, "Redo"),
            Shortcut::new("Y", true, false, Redo, "Redo"),
            Shortcut::new("A", true, false, SelectAll, "Select all drawables"),
            Shortcut::new("G", true, false, Group, "Group selected drawables"),
            Shortcut::new("G", true, true, Ungroup, "Ungroup selected drawables"),
            Shortcut::new("Escape", false, false, Cancel, "Cancel current action"),
            Shortcut::new("V", false, false, SetTool(ToolKind::Select), "Select tool"),
            Shortcut::new("P", false, false, SetTool(ToolKind::Draw), "Freehand tool"),
            Shortcut::new("T", false, false, SetTool(ToolKind::Text), "Text tool"),
            Shortcut::new("E", false, false, SetTool(ToolKind::Eraser), "Eraser tool"),
            Shortcut::new("R", false, false, SetTool(ToolKind::Rectangle), "Rectangle tool"),
            Shortcut::new("O", false, false, SetTool(ToolKind::Ellipse), "Ellipse tool"),
            Shortcut::new("C", false, false, SetTool(ToolKind::Circle), "Circle tool"),
            Shortcut::new("L", false, false, SetTool(ToolKind::Line), "Line tool"),
        ]
    }

    /// Find the action bound to a key press.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        Self::all()
            .into_iter()
            .find(|s| s.matches(key, modifiers))
            .map(|s| s.action)
    }

    /// Human-readable shortcut listing, one per line.
    pub fn describe() -> String {
        Self::all()
            .iter()
            .map(|s| format!("{:14} {}", s.format(), s.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
