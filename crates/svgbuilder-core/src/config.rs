//! Editor configuration.

use crate::canvas::{DEFAULT_BACKGROUND, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::factory::FREEHAND_MIN_DISTANCE;
use crate::history::DEFAULT_CAPACITY;
use crate::snap::GRID_SIZE;
use crate::storage::DEFAULT_DEBOUNCE_MS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default hit tolerance for handles and thin shapes, in canvas units.
pub const HANDLE_TOLERANCE: f64 = 8.0;

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Value out of range for '{key}': {value}")]
    ValueOutOfRange { key: &'static str, value: String },
}

/// Tunables for an [`Editor`](crate::editor::Editor). Every field has a
/// default, so a partial JSON document is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub grid_size: f64,
    /// Snap pointer positions to the grid while drawing and dragging.
    pub snap_to_grid: bool,
    pub history_capacity: usize,
    /// Quiet interval before a pending change is persisted.
    pub autosave_debounce_ms: u64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub background_color: String,
    pub handle_tolerance: f64,
    pub freehand_min_distance: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            snap_to_grid: false,
            history_capacity: DEFAULT_CAPACITY,
            autosave_debounce_ms: DEFAULT_DEBOUNCE_MS,
            canvas_width: DEFAULT_WIDTH,
            canvas_height: DEFAULT_HEIGHT,
            background_color: DEFAULT_BACKGROUND.to_string(),
            handle_tolerance: HANDLE_TOLERANCE,
            freehand_min_distance: FREEHAND_MIN_DISTANCE,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("grid_size", self.grid_size),
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::ValueOutOfRange {
                    key,
                    value: value.to_string(),
                });
            }
        }
        let non_negative = [
            ("handle_tolerance", self.handle_tolerance),
            ("freehand_min_distance", self.freehand_min_distance),
        ];
        for (key, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::ValueOutOfRange {
                    key,
                    value: value.to_string(),
                });
            }
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "history_capacity",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.grid_size, 20.0);
        assert_eq!(config.history_capacity, 50);
        assert_eq!(config.autosave_debounce(), Duration::from_millis(500));
        assert_eq!((config.canvas_width, config.canvas_height), (800.0, 600.0));
        assert_eq!(config.background_color, "#ffffff");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = EditorConfig::from_json(r#"{ "grid_size": 10, "snap_to_grid": true }"#).unwrap();
        assert_eq!(config.grid_size, 10.0);
        assert!(config.snap_to_grid);
        assert_eq!(config.history_capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            EditorConfig::from_json(r#"{ "grid_size": 0 }"#),
            Err(ConfigError::ValueOutOfRange { key: "grid_size", .. })
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{ "history_capacity": 0 }"#),
            Err(ConfigError::ValueOutOfRange { key: "history_capacity", .. })
        ));
        assert!(matches!(EditorConfig::from_json("{"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        let mut config = EditorConfig::default();
        config.snap_to_grid = true;
        std::fs::write(&path, config.to_json().unwrap()).unwrap();
        assert_eq!(EditorConfig::load_from_file(&path).unwrap(), config);
    }
}
