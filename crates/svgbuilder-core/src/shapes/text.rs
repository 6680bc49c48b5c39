//! Text shape.

use super::{GeometryTrait, ShapeStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Default font size for new text.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
/// Default font family for new text.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";
/// Average glyph advance as a fraction of the font size.
const AVERAGE_CHAR_WIDTH: f64 = 0.6;

/// A text run anchored at its first baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    /// Anchor point (start of the first baseline).
    pub position: Point,
    /// The text content.
    pub content: String,
    /// Font size in canvas units.
    pub font_size: f64,
    /// Font family name.
    pub font_family: String,
}

impl Text {
    pub fn new(position: Point, content: impl Into<String>) -> Self {
        Self {
            position,
            content: content.into(),
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }

    /// Approximate size as (width, height).
    ///
    /// This is a character-count heuristic, not glyph metrics: every character
    /// advances `0.6 × font_size` and every line is one `font_size` tall. Empty
    /// text has no size.
    pub fn approximate_size(&self) -> (f64, f64) {
        let lines: Vec<&str> = self.content.lines().collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        (
            longest as f64 * self.font_size * AVERAGE_CHAR_WIDTH,
            lines.len() as f64 * self.font_size,
        )
    }
}

impl GeometryTrait for Text {
    fn local_bounds(&self) -> Option<Rect> {
        let (width, height) = self.approximate_size();
        // The first line sits above the baseline anchor.
        let ascent = if height > 0.0 { self.font_size } else { 0.0 };
        let top = self.position.y - ascent;
        Some(Rect::new(
            self.position.x,
            top,
            self.position.x + width,
            top + height,
        ))
    }

    fn hit_test(&self, point: Point, tolerance: f64, _style: &ShapeStyle) -> bool {
        self.local_bounds()
            .is_some_and(|b| b.inflate(tolerance, tolerance).contains(point))
    }
}
