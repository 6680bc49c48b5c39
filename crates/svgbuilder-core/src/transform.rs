//! Structured shape transform (translation composed with rotation).
//!
//! Shapes keep `{translate_x, translate_y, rotation}` as plain numbers. The
//! textual `translate(..) rotate(..)` form only exists at the markup boundary,
//! where it is rendered with the current bounds centre as pivot.

use crate::markup::format_number;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Translation followed by a rotation about the shape's local bounds centre.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    /// Rotation in degrees, clockwise in screen space (y down).
    pub rotation: f64,
}

impl ShapeTransform {
    pub fn new(translate_x: f64, translate_y: f64, rotation: f64) -> Self {
        Self {
            translate_x,
            translate_y,
            rotation,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.translate_x == 0.0 && self.translate_y == 0.0 && self.rotation == 0.0
    }

    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.translate_x, self.translate_y)
    }

    /// Add to the translation; the rotation is preserved.
    pub fn translate_by(&mut self, dx: f64, dy: f64) {
        self.translate_x += dx;
        self.translate_y += dy;
    }

    /// Map a local point onto the canvas: rotate about `pivot`, then translate.
    pub fn local_to_canvas(&self, point: Point, pivot: Point) -> Point {
        rotate_about(point, pivot, self.rotation) + self.translation()
    }

    /// Inverse of [`ShapeTransform::local_to_canvas`].
    pub fn canvas_to_local(&self, point: Point, pivot: Point) -> Point {
        rotate_about(point - self.translation(), pivot, -self.rotation)
    }

    /// Render as a markup `transform` value, or `None` for the identity.
    pub fn to_markup(&self, pivot: Point) -> Option<String> {
        if self.is_identity() {
            return None;
        }
        let mut out = format!(
            "translate({}, {})",
            format_number(self.translate_x),
            format_number(self.translate_y)
        );
        if self.rotation != 0.0 {
            out.push_str(&format!(
                " rotate({}, {}, {})",
                format_number(self.rotation),
                format_number(pivot.x),
                format_number(pivot.y)
            ));
        }
        Some(out)
    }

    /// Parse a markup `transform` value.
    ///
    /// Only `translate` and `rotate` are understood; translations accumulate and
    /// the last rotation angle wins. The rotate pivot is not kept because it is
    /// always re-derived from the shape's bounds. Other functions, and calls
    /// with an argument that is not a finite number, are skipped and reported.
    pub fn parse(value: &str) -> (Self, Vec<TransformIssue>) {
        let mut transform = Self::default();
        let mut issues = Vec::new();

        for call in transform_functions(value) {
            if !matches!(call.name.as_str(), "translate" | "rotate") {
                issues.push(TransformIssue::Unsupported(call.name));
                continue;
            }
            let args = match call.numbers() {
                Ok(args) => args,
                Err(raw) => {
                    issues.push(TransformIssue::InvalidArgument {
                        function: call.name,
                        raw,
                    });
                    continue;
                }
            };
            if call.name == "translate" {
                transform.translate_x += args.first().copied().unwrap_or(0.0);
                transform.translate_y += args.get(1).copied().unwrap_or(0.0);
            } else {
                transform.rotation = args.first().copied().unwrap_or(0.0);
            }
        }

        (transform, issues)
    }
}

/// A part of a `transform` value that [`ShapeTransform::parse`] skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformIssue {
    Unsupported(String),
    InvalidArgument { function: String, raw: String },
}

impl fmt::Display for TransformIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformIssue::Unsupported(name) => {
                write!(f, "Unsupported transform function {}()", name)
            }
            TransformIssue::InvalidArgument { function, raw } => {
                write!(f, "Invalid argument {:?} to {}()", raw, function)
            }
        }
    }
}

/// Rotate `point` about `center` by `degrees`.
pub fn rotate_about(point: Point, center: Point, degrees: f64) -> Point {
    if degrees == 0.0 {
        return point;
    }
    let (sin_r, cos_r) = degrees.to_radians().sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(
        center.x + dx * cos_r - dy * sin_r,
        center.y + dx * sin_r + dy * cos_r,
    )
}

struct TransformCall<'a> {
    name: String,
    args: Vec<&'a str>,
}

impl TransformCall<'_> {
    /// Arguments as finite numbers, or the first raw argument that is not one.
    fn numbers(&self) -> Result<Vec<f64>, String> {
        self.args
            .iter()
            .map(|raw| {
                raw.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| raw.to_string())
            })
            .collect()
    }
}

/// Split `name(a, b) name2(c)` into calls with their raw arguments.
fn transform_functions(value: &str) -> Vec<TransformCall<'_>> {
    let mut out = Vec::new();
    let mut rest = value;

    while let Some(open) = rest.find('(') {
        let name = rest[..open]
            .trim_matches(|c: char| c.is_whitespace() || c == ',')
            .to_string();
        let Some(close) = rest[open..].find(')') else {
            break;
        };
        let args = rest[open + 1..open + close]
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();
        out.push(TransformCall { name, args });
        rest = &rest[open + close + 1..];
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_has_no_markup() {
        assert_eq!(ShapeTransform::default().to_markup(Point::ZERO), None);
    }

    #[test]
    fn test_markup_with_rotation() {
        let t = ShapeTransform::new(10.0, -5.5, 45.0);
        assert_eq!(
            t.to_markup(Point::new(50.0, 25.0)).as_deref(),
            Some("translate(10, -5.5) rotate(45, 50, 25)")
        );
    }

    #[test]
    fn test_markup_translation_only() {
        let t = ShapeTransform::new(3.0, 4.0, 0.0);
        assert_eq!(t.to_markup(Point::ZERO).as_deref(), Some("translate(3, 4)"));
    }

    #[test]
    fn test_parse_round_trip() {
        let t = ShapeTransform::new(12.25, 7.0, -30.5);
        let text = t.to_markup(Point::new(1.0, 2.0)).unwrap();
        let (parsed, issues) = ShapeTransform::parse(&text);
        assert_eq!(parsed, t);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_parse_reports_unsupported() {
        let (parsed, issues) = ShapeTransform::parse("translate(5) scale(2) rotate(10 3 4)");
        assert_eq!(parsed, ShapeTransform::new(5.0, 0.0, 10.0));
        assert_eq!(issues, vec![TransformIssue::Unsupported("scale".to_string())]);
    }

    #[test]
    fn test_parse_skips_non_finite_arguments() {
        let (parsed, issues) = ShapeTransform::parse("translate(4 2) rotate(NaN) translate(inf 0) rotate(x)");
        assert_eq!(parsed, ShapeTransform::new(4.0, 2.0, 0.0));
        assert_eq!(
            issues,
            vec![
                TransformIssue::InvalidArgument {
                    function: "rotate".to_string(),
                    raw: "NaN".to_string()
                },
                TransformIssue::InvalidArgument {
                    function: "translate".to_string(),
                    raw: "inf".to_string()
                },
                TransformIssue::InvalidArgument {
                    function: "rotate".to_string(),
                    raw: "x".to_string()
                },
            ]
        );
        assert_eq!(issues[1].to_string(), r#"Invalid argument "inf" to translate()"#);
    }

    #[test]
    fn test_local_canvas_inverse() {
        let t = ShapeTransform::new(30.0, -10.0, 33.0);
        let pivot = Point::new(50.0, 50.0);
        let p = Point::new(12.0, 80.0);
        let back = t.canvas_to_local(t.local_to_canvas(p, pivot), pivot);
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_about_quarter_turn() {
        let p = rotate_about(Point::new(10.0, 0.0), Point::ZERO, 90.0);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 10.0).abs() < 1e-9);
    }
}
