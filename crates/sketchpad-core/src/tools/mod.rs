//! Tool system: the active tool and the drafting state machine.

mod draft;

pub use draft::{DraftController, DraftEvent, DraftState};

use crate::config::DraftConfig;
use crate::synth::ShapeKind;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolKind {
    #[default]
    Select,
    /// Freehand drawing.
    Draw,
    Text,
    Eraser,
    Rectangle,
    Ellipse,
    Circle,
    Line,
    Triangle,
    Diamond,
    Pentagon,
    Hexagon,
    Star,
}

impl ToolKind {
    /// The synthesized shape for drag tools, `None` for everything else.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Ellipse => Some(ShapeKind::Ellipse),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Triangle => Some(ShapeKind::Triangle),
            ToolKind::Diamond => Some(ShapeKind::Diamond),
            ToolKind::Pentagon => Some(ShapeKind::Pentagon),
            ToolKind::Hexagon => Some(ShapeKind::Hexagon),
            ToolKind::Star => Some(ShapeKind::Star),
            ToolKind::Select | ToolKind::Draw | ToolKind::Text | ToolKind::Eraser => None,
        }
    }

    /// Whether the tool stays active after finishing a drawable.
    pub fn is_sticky(self, config: &DraftConfig) -> bool {
        match self {
            ToolKind::Select | ToolKind::Draw | ToolKind::Eraser => true,
            _ => config.sticky_shape_tools,
        }
    }
}

/// Tool that should be active after `event` was produced with `tool` active.
///
/// Non-sticky tools fall back to [`ToolKind::Select`] once a draft is
/// committed or discarded, or once a text has been placed.
pub fn next_tool(tool: ToolKind, event: &DraftEvent, config: &DraftConfig) -> ToolKind {
    let finished = matches!(
        event,
        DraftEvent::Committed(_) | DraftEvent::Discarded | DraftEvent::TextStarted(_)
    );
    if finished && !tool.is_sticky(config) {
        ToolKind::Select
    } else {
        tool
    }
}
