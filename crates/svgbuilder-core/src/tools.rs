//! Tool system for the editor.

use crate::shapes::{ParseKindError, ShapeKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Icon id returned for tool names without a mapping.
pub const FALLBACK_ICON: &str = "fa-question";

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    Rectangle,
    Circle,
    Ellipse,
    Line,
    Text,
    /// Freehand path.
    Path,
    /// Multi-click path whose segments alternate horizontal and vertical.
    Polyline,
}

impl ToolKind {
    pub fn all() -> &'static [ToolKind] {
        &[
            ToolKind::Select,
            ToolKind::Pan,
            ToolKind::Rectangle,
            ToolKind::Circle,
            ToolKind::Ellipse,
            ToolKind::Line,
            ToolKind::Text,
            ToolKind::Path,
            ToolKind::Polyline,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Pan => "pan",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Line => "line",
            ToolKind::Text => "text",
            ToolKind::Path => "path",
            ToolKind::Polyline => "polyline",
        }
    }

    /// Shape kind this tool creates, if any.
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            ToolKind::Select | ToolKind::Pan => None,
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Ellipse => Some(ShapeKind::Ellipse),
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Text => Some(ShapeKind::Text),
            ToolKind::Path | ToolKind::Polyline => Some(ShapeKind::Path),
        }
    }

    /// Whether pointer-down with this tool starts drawing a new shape.
    pub fn is_drawing_tool(&self) -> bool {
        self.shape_kind().is_some()
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ToolKind::Select => "fa-mouse-pointer",
            ToolKind::Pan => "fa-hand-paper-o",
            ToolKind::Rectangle => "fa-square-o",
            ToolKind::Circle => "fa-circle-o",
            ToolKind::Ellipse => "fa-circle-thin",
            ToolKind::Line => "fa-minus",
            ToolKind::Text => "fa-font",
            ToolKind::Path => "fa-pencil",
            ToolKind::Polyline => "fa-level-up",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ToolKind::all()
            .iter()
            .copied()
            .find(|tool| tool.name() == lower)
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}

/// Icon id for a tool name, or [`FALLBACK_ICON`] when the name is unknown.
pub fn tool_icon(name: &str) -> &'static str {
    name.parse::<ToolKind>()
        .map(|tool| tool.icon())
        .unwrap_or(FALLBACK_ICON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tool_has_an_icon() {
        for tool in ToolKind::all() {
            assert_eq!(tool_icon(tool.name()), tool.icon());
            assert_ne!(tool.icon(), FALLBACK_ICON);
        }
    }

    #[test]
    fn test_unknown_tool_falls_back() {
        assert_eq!(tool_icon("lasso"), FALLBACK_ICON);
        assert_eq!(tool_icon(""), FALLBACK_ICON);
    }

    #[test]
    fn test_tool_shape_kinds() {
        assert_eq!(ToolKind::Select.shape_kind(), None);
        assert_eq!(ToolKind::Polyline.shape_kind(), Some(ShapeKind::Path));
        assert!(ToolKind::Circle.is_drawing_tool());
        assert!(!ToolKind::Pan.is_drawing_tool());
    }
}
