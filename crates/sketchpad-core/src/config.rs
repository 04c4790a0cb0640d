//! Engine tuning knobs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Drafting behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DraftConfig {
    /// Smallest width/height (or line/path length) a draft must reach to be kept.
    pub min_size: f64,
    /// Keep shape and text tools active after a commit instead of reverting to select.
    pub sticky_shape_tools: bool,
    /// Content of a freshly placed text.
    pub text_placeholder: String,
    pub font_size: f64,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            min_size: 5.0,
            sticky_shape_tools: false,
            text_placeholder: "Double click to edit".to_string(),
            font_size: 16.0,
        }
    }
}

/// Precision eraser policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EraserConfig {
    pub radius: f64,
    /// Half of the gap cut into a line, as a multiple of the radius.
    pub split_gap_factor: f64,
    /// Lines only split when the hit's projection parameter lies strictly
    /// between these bounds.
    pub split_min_t: f64,
    pub split_max_t: f64,
    /// Split pieces shorter than this are dropped.
    pub min_piece_length: f64,
    /// Drawables at or below this opacity are removed.
    pub removal_threshold: f64,
    /// Opacity lost per hit near a line end.
    pub line_decay: f64,
    /// Opacity lost per hit away from a shape's center.
    pub edge_decay: f64,
    /// Opacity lost per hit near a shape's center.
    pub center_decay: f64,
}

impl Default for EraserConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            split_gap_factor: 0.8,
            split_min_t: 0.1,
            split_max_t: 0.9,
            min_piece_length: 5.0,
            removal_threshold: 0.1,
            line_decay: 0.15,
            edge_decay: 0.1,
            center_decay: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectionConfig {
    /// Max distance between two clicks that still count as "the same point"
    /// for alternate cycling.
    pub cycle_tolerance: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            cycle_tolerance: 3.0,
        }
    }
}

/// Complete engine configuration; every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub draft: DraftConfig,
    pub eraser: EraserConfig,
    pub selection: SelectionConfig,
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be positive, got {}", value),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must not be negative, got {}", value),
        })
    }
}

fn unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be within [0, 1], got {}", value),
        })
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let draft = &self.draft;
        positive("draft.minSize", draft.min_size)?;
        positive("draft.fontSize", draft.font_size)?;

        let eraser = &self.eraser;
        non_negative("eraser.radius", eraser.radius)?;
        positive("eraser.splitGapFactor", eraser.split_gap_factor)?;
        non_negative("eraser.minPieceLength", eraser.min_piece_length)?;
        unit("eraser.splitMinT", eraser.split_min_t)?;
        unit("eraser.splitMaxT", eraser.split_max_t)?;
        if eraser.split_min_t >= eraser.split_max_t {
            return Err(ConfigError::Invalid {
                field: "eraser.splitMinT",
                reason: format!(
                    "must be below splitMaxT ({} >= {})",
                    eraser.split_min_t, eraser.split_max_t
                ),
            });
        }
        unit("eraser.removalThreshold", eraser.removal_threshold)?;
        unit("eraser.lineDecay", eraser.line_decay)?;
        unit("eraser.edgeDecay", eraser.edge_decay)?;
        unit("eraser.centerDecay", eraser.center_decay)?;

        non_negative("selection.cycleTolerance", self.selection.cycle_tolerance)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            EngineConfig::from_json(r#"{"draft":{"stickyShapeTools":true},"eraser":{"radius":4}}"#)
                .unwrap();
        assert!(config.draft.sticky_shape_tools);
        assert_eq!(config.draft.min_size, 5.0);
        assert_eq!(config.eraser.radius, 4.0);
        assert_eq!(config.eraser.line_decay, 0.15);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let err = EngineConfig::from_json(r#"{"eraser":{"removalThreshold":1.5}}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "eraser.removalThreshold",
                ..
            }
        ));

        let err = EngineConfig::from_json(r#"{"draft":{"minSize":0}}"#).unwrap_err();
        assert!(err.to_string().contains("draft.minSize"));

        let err = EngineConfig::from_json(r#"{"eraser":{"splitMinT":0.6,"splitMaxT":0.4}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            EngineConfig::from_json("{not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
