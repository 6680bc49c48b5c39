//! Persisted canvas record.

use crate::canvas::{DEFAULT_BACKGROUND, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use serde::{Deserialize, Serialize};

/// What gets persisted for a canvas: its markup plus page settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasRecord {
    pub name: String,
    /// Serialized markup of the canvas.
    pub content: String,
    pub width: f64,
    pub height: f64,
    pub background_color: String,
}

impl Default for CanvasRecord {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl CanvasRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: String::new(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background_color: DEFAULT_BACKGROUND.to_string(),
        }
    }

    pub fn update_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let record = CanvasRecord::new("Logo");
        assert_eq!(record.name, "Logo");
        assert!(record.content.is_empty());
        assert_eq!((record.width, record.height), (800.0, 600.0));
        assert_eq!(record.background_color, "#ffffff");
    }

    #[test]
    fn test_json_missing_fields_use_defaults() {
        let record = CanvasRecord::from_json(r#"{ "name": "a", "content": "<svg/>" }"#).unwrap();
        assert_eq!(record.content, "<svg/>");
        assert_eq!(record.width, 800.0);
    }
}
