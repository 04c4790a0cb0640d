//! Sketchpad Core Library
//!
//! Geometry engine for the Sketchpad diagramming surface: shape drafting,
//! the precision eraser, selection and z-order, and the scene they mutate.
//! Rendering, widgets and persistence backends are the host's business.

pub mod canvas;
pub mod config;
pub mod eraser;
pub mod geometry;
pub mod import;
pub mod input;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod shortcuts;
pub mod storage;
pub mod synth;
pub mod tools;

pub use canvas::{Canvas, ImportOutcome};
pub use config::{ConfigError, DraftConfig, EngineConfig, EraserConfig, SelectionConfig};
pub use eraser::{EraseReport, EraserEngine, EraserStroke};
pub use import::{ImportBatch, ImportError, ImportMode, ImportReport, ImportSender};
pub use input::{KeyEvent, Modifiers, PointerEvent};
pub use scene::Scene;
pub use selection::SelectionController;
pub use shapes::{Color, Drawable, DrawableId, GroupId, Shape, Style};
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry};
pub use synth::{ShapeKind, synthesize};
pub use tools::{DraftController, DraftEvent, DraftState, ToolKind};
