//! Recorded input scripts.

use serde::Deserialize;
use sketchpad_core::{
    Canvas, ConfigError, EngineConfig, ImportError, ImportMode, KeyEvent, Modifiers, PointerEvent,
    ToolKind,
};
use kurbo::Point;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid script: {0}")]
    Script(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("event {index}: {source}")]
    Import { index: usize, source: ImportError },
    #[error("no scene attached")]
    NoScene,
}

/// One recorded input event.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScriptEvent {
    Tool {
        tool: ToolKind,
    },
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up {
        x: f64,
        y: f64,
    },
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Type into the text being edited; `commit` ends editing.
    Text {
        content: String,
        #[serde(default)]
        commit: bool,
    },
    Import {
        payload: serde_json::Value,
        #[serde(default)]
        mode: ImportMode,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: Option<EngineConfig>,
    pub events: Vec<ScriptEvent>,
}

impl Script {
    pub fn parse(json: &str) -> Result<Self, ReplayError> {
        let script: Script = serde_json::from_str(json)?;
        if let Some(config) = &script.config {
            config.validate()?;
        }
        Ok(script)
    }

    /// Replay every event on a fresh canvas and return the scene document.
    pub fn replay(self) -> Result<String, ReplayError> {
        let mut canvas = Canvas::with_config(self.config.unwrap_or_default());
        let total = self.events.len();
        for (index, event) in self.events.into_iter().enumerate() {
            log::debug!("Event {}/{}: {:?}", index + 1, total, event);
            apply(&mut canvas, index, event)?;
        }
        canvas.poll_imports();
        let json = canvas.export_json()?.ok_or(ReplayError::NoScene)?;
        log::info!(
            "Replayed {} event(s); scene has {} drawable(s)",
            total,
            canvas.scene().map(|s| s.len()).unwrap_or_default()
        );
        Ok(json)
    }
}

fn apply(canvas: &mut Canvas, index: usize, event: ScriptEvent) -> Result<(), ReplayError> {
    match event {
        ScriptEvent::Tool { tool } => canvas.set_tool(tool),
        ScriptEvent::Down { x, y, modifiers } => canvas.handle_pointer(PointerEvent::Down {
            position: Point::new(x, y),
            modifiers,
        }),
        ScriptEvent::Move { x, y } => canvas.handle_pointer(PointerEvent::Move {
            position: Point::new(x, y),
        }),
        ScriptEvent::Up { x, y } => canvas.handle_pointer(PointerEvent::Up {
            position: Point::new(x, y),
        }),
        ScriptEvent::Key { key, modifiers } => {
            if !canvas.handle_key(&KeyEvent::new(key.clone(), modifiers)) {
                log::debug!("Key {:?} had no effect", key);
            }
        }
        ScriptEvent::Text { content, commit } => {
            if !canvas.set_text(&content) {
                log::warn!("Text event {} ignored: no text is being edited", index);
            }
            if commit {
                canvas.commit_text();
            }
        }
        ScriptEvent::Import { payload, mode } => {
            let json = payload.to_string();
            canvas
                .import_str(&json, mode)
                .map_err(|source| ReplayError::Import { index, source })?;
        }
    }
    Ok(())
}
