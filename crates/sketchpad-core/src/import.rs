//! Scene import from external collaborators (file picker, diagram generator).
//!
//! Payloads are validated up front: a payload whose `objects` field is
//! missing or not a list is rejected before anything touches the scene.
//! Individual records that cannot be understood are skipped with a warning.

use crate::scene::Scene;
use crate::shapes::{Drawable, SHAPE_TYPES};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::mpsc;
use thiserror::Error;

/// Import errors.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing 'objects' list")]
    MissingObjects,
    #[error("'objects' must be a list, found {0}")]
    NotASequence(&'static str),
    #[error("Import inbox is closed")]
    InboxClosed,
}

/// How imported drawables combine with the existing scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportMode {
    /// Clear the scene, then add the imported drawables.
    #[default]
    Replace,
    /// Add the imported drawables on top of the existing ones.
    Append,
}

/// A validated import, ready to apply.
#[derive(Debug, Clone)]
pub struct ImportBatch {
    pub drawables: Vec<Drawable>,
    pub skipped: usize,
    pub mode: ImportMode,
}

/// Outcome of an applied import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub mode: ImportMode,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

impl ImportBatch {
    /// Parse and validate a JSON payload of the form `{"objects": [...]}`.
    pub fn parse(json: &str, mode: ImportMode) -> Result<Self, ImportError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value, mode)
    }

    pub fn from_value(value: &Value, mode: ImportMode) -> Result<Self, ImportError> {
        let objects = value.get("objects").ok_or(ImportError::MissingObjects)?;
        let entries = objects
            .as_array()
            .ok_or_else(|| ImportError::NotASequence(json_kind(objects)))?;

        let mut drawables = Vec::with_capacity(entries.len());
        let mut skipped = 0;
        for (index, entry) in entries.iter().enumerate() {
            match parse_record(entry) {
                Ok(drawable) => drawables.push(drawable),
                Err(reason) => {
                    log::warn!("Skipping import entry {}: {}", index, reason);
                    skipped += 1;
                }
            }
        }
        Ok(Self {
            drawables,
            skipped,
            mode,
        })
    }

    /// Apply to `scene` as a single undo step.
    pub fn apply(self, scene: &mut Scene) -> ImportReport {
        scene.push_undo();
        let imported = self.drawables.len();
        match self.mode {
            ImportMode::Replace => {
                scene.replace_all(self.drawables);
            }
            ImportMode::Append => {
                scene.extend(self.drawables);
            }
        }
        log::info!(
            "Imported {} drawable(s) ({:?}), skipped {}",
            imported,
            self.mode,
            self.skipped
        );
        ImportReport {
            imported,
            skipped: self.skipped,
            mode: self.mode,
        }
    }
}

fn parse_record(entry: &Value) -> Result<Drawable, String> {
    let kind = entry
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing 'type'".to_string())?;
    if !SHAPE_TYPES.contains(&kind) {
        return Err(format!("unsupported type '{}'", kind));
    }
    let mut drawable: Drawable =
        serde_json::from_value(entry.clone()).map_err(|e| format!("malformed {}: {}", kind, e))?;
    let opacity = drawable.style.opacity;
    drawable.style.set_opacity(opacity);
    Ok(drawable)
}

/// Cloneable handle for submitting imports from any thread.
#[derive(Debug, Clone)]
pub struct ImportSender {
    tx: mpsc::Sender<ImportBatch>,
}

impl ImportSender {
    pub(crate) fn new(tx: mpsc::Sender<ImportBatch>) -> Self {
        Self { tx }
    }

    /// Validate `json` and queue it for the canvas.
    ///
    /// Validation errors are reported here, to the submitter.
    pub fn send(&self, json: &str, mode: ImportMode) -> Result<(), ImportError> {
        let batch = ImportBatch::parse(json, mode)?;
        self.send_batch(batch)
    }

    pub fn send_batch(&self, batch: ImportBatch) -> Result<(), ImportError> {
        self.tx.send(batch).map_err(|_| ImportError::InboxClosed)
    }
}
