//! Shape definitions for the editor.
//!
//! A [`Shape`] is a kind-specific [`Geometry`] expressed in its own local frame,
//! a shared [`ShapeStyle`], and a [`ShapeTransform`] that places the local frame
//! on the canvas (rotation about the local bounds centre, then translation).

mod circle;
mod ellipse;
mod line;
mod path;
mod rectangle;
mod text;

pub use circle::Circle;
pub use ellipse::Ellipse;
pub use line::Line;
pub use path::{PathShape, Subpath, parse_path};
pub use rectangle::Rectangle;
pub use text::Text;

use crate::transform::ShapeTransform;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// The fixed set of primitive kinds the editor supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Ellipse,
    Line,
    Text,
    Path,
}

impl ShapeKind {
    /// Markup element name for this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rect",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Line => "line",
            ShapeKind::Text => "text",
            ShapeKind::Path => "path",
        }
    }

    /// Look up a kind by its markup element name.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::all().iter().copied().find(|kind| kind.tag() == tag)
    }

    /// Human readable name (also accepted by [`FromStr`]).
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Line => "line",
            ShapeKind::Text => "text",
            ShapeKind::Path => "path",
        }
    }

    pub fn all() -> &'static [ShapeKind] {
        &[
            ShapeKind::Rectangle,
            ShapeKind::Circle,
            ShapeKind::Ellipse,
            ShapeKind::Line,
            ShapeKind::Text,
            ShapeKind::Path,
        ]
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a shape kind name is not one of the supported primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported shape kind: {0}")]
pub struct ParseKindError(pub String);

impl FromStr for ShapeKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ShapeKind::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == lower || kind.tag() == lower)
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}

/// Style properties shared by every shape kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill paint (`none` = no fill).
    pub fill: String,
    /// Stroke paint.
    pub stroke: String,
    /// Stroke width.
    pub stroke_width: f64,
}

impl ShapeStyle {
    /// Whether the fill paints anything.
    pub fn is_filled(&self) -> bool {
        !matches!(self.fill.trim(), "" | "none" | "transparent")
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: "none".to_string(),
            stroke: "#000000".to_string(),
            stroke_width: 2.0,
        }
    }
}

/// Attribute overrides merged over the default style when a shape is created,
/// or applied by a property edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleOverrides {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    /// Only meaningful for text shapes.
    pub font_size: Option<f64>,
    /// Only meaningful for text shapes.
    pub font_family: Option<String>,
}

impl StyleOverrides {
    /// Check if nothing is overridden.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the overrides to a shape.
    pub fn apply(&self, shape: &mut Shape) {
        if let Some(fill) = &self.fill {
            shape.style.fill = fill.clone();
        }
        if let Some(stroke) = &self.stroke {
            shape.style.stroke = stroke.clone();
        }
        if let Some(width) = self.stroke_width {
            shape.style.stroke_width = width.max(0.0);
        }
        if let Some(text) = shape.as_text_mut() {
            if let Some(size) = self.font_size {
                text.font_size = size.max(0.0);
            }
            if let Some(family) = &self.font_family {
                text.font_family = family.clone();
            }
        }
    }
}

/// Behaviour every kind-specific geometry provides, in local coordinates.
pub trait GeometryTrait {
    /// Unrotated, untranslated bounding box. `None` for degenerate geometry
    /// that has no box at all (e.g. a path without coordinates).
    fn local_bounds(&self) -> Option<Rect>;

    /// Check if a local-frame point hits this geometry.
    fn hit_test(&self, point: Point, tolerance: f64, style: &ShapeStyle) -> bool;
}

/// Kind-specific geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Rectangle(Rectangle),
    Circle(Circle),
    Ellipse(Ellipse),
    Line(Line),
    Text(Text),
    Path(PathShape),
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Rectangle(_) => ShapeKind::Rectangle,
            Geometry::Circle(_) => ShapeKind::Circle,
            Geometry::Ellipse(_) => ShapeKind::Ellipse,
            Geometry::Line(_) => ShapeKind::Line,
            Geometry::Text(_) => ShapeKind::Text,
            Geometry::Path(_) => ShapeKind::Path,
        }
    }

    fn as_trait(&self) -> &dyn GeometryTrait {
        match self {
            Geometry::Rectangle(g) => g,
            Geometry::Circle(g) => g,
            Geometry::Ellipse(g) => g,
            Geometry::Line(g) => g,
            Geometry::Text(g) => g,
            Geometry::Path(g) => g,
        }
    }

    pub fn local_bounds(&self) -> Option<Rect> {
        self.as_trait().local_bounds()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64, style: &ShapeStyle) -> bool {
        self.as_trait().hit_test(point, tolerance, style)
    }
}

/// A drawable primitive on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub(crate) id: ShapeId,
    /// Geometry is private so the kind can never change after creation.
    geometry: Geometry,
    /// Style properties.
    pub style: ShapeStyle,
    /// Placement of the local frame on the canvas.
    pub transform: ShapeTransform,
    /// Markup attributes the model does not interpret, kept verbatim in order.
    #[serde(default)]
    pub extra_attributes: Vec<(String, String)>,
}

macro_rules! geometry_accessors {
    ($($variant:ident, $ty:ty, $as_ref:ident, $as_mut:ident;)*) => {
        $(
            pub fn $as_ref(&self) -> Option<&$ty> {
                match &self.geometry {
                    Geometry::$variant(g) => Some(g),
                    _ => None,
                }
            }

            pub fn $as_mut(&mut self) -> Option<&mut $ty> {
                match &mut self.geometry {
                    Geometry::$variant(g) => Some(g),
                    _ => None,
                }
            }
        )*
    };
}

impl Shape {
    /// Create a shape with a fresh id, default style and identity transform.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: Uuid::new_v4(),
            geometry,
            style: ShapeStyle::default(),
            transform: ShapeTransform::default(),
            extra_attributes: Vec::new(),
        }
    }

    /// Builder-style style setter.
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    geometry_accessors! {
        Rectangle, Rectangle, as_rectangle, as_rectangle_mut;
        Circle, Circle, as_circle, as_circle_mut;
        Ellipse, Ellipse, as_ellipse, as_ellipse_mut;
        Line, Line, as_line, as_line_mut;
        Text, Text, as_text, as_text_mut;
        Path, PathShape, as_path, as_path_mut;
    }

    /// Unrotated bounding box in the shape's own frame.
    pub fn local_bounds(&self) -> Option<Rect> {
        self.geometry.local_bounds()
    }

    /// Rotation angle in degrees.
    pub fn rotation(&self) -> f64 {
        self.transform.rotation
    }

    /// Set the rotation angle in degrees. Translation is untouched.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.transform.rotation = degrees;
    }

    /// Text body, present only for text shapes.
    pub fn text_content(&self) -> Option<&str> {
        self.as_text().map(|t| t.content.as_str())
    }

    /// Regenerate the shape's id, used when duplicating or importing.
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    /// Compare everything except the id.
    pub fn same_content(&self, other: &Shape) -> bool {
        self.geometry == other.geometry
            && self.style == other.style
            && self.transform == other.transform
            && self.extra_attributes == other.extra_attributes
    }

    /// Check if a canvas point hits this shape, honouring its transform.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let Some(local_box) = self.local_bounds() else {
            return false;
        };
        let local = self.transform.canvas_to_local(point, local_box.center());
        self.geometry.hit_test(local, tolerance, &self.style)
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    point.distance(proj)
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    if let [single] = points {
        return point.distance(*single);
    }
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Min/max envelope of a set of points.
pub(crate) fn envelope(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
    points.into_iter().fold(None, |acc: Option<Rect>, p| {
        Some(match acc {
            Some(r) => r.union_pt(p),
            None => Rect::from_points(p, p),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!("rectangle".parse::<ShapeKind>(), Ok(ShapeKind::Rectangle));
        assert_eq!("rect".parse::<ShapeKind>(), Ok(ShapeKind::Rectangle));
        assert_eq!(" Ellipse ".parse::<ShapeKind>(), Ok(ShapeKind::Ellipse));
        assert!("star".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn test_kind_tags_round_trip() {
        for kind in ShapeKind::all() {
            assert_eq!(ShapeKind::from_tag(kind.tag()), Some(*kind));
        }
        assert_eq!(ShapeKind::from_tag("polygon"), None);
    }

    #[test]
    fn test_overrides_apply() {
        let mut shape = Shape::new(Geometry::Text(Text::new(Point::new(0.0, 0.0), "hi")));
        let overrides = StyleOverrides {
            fill: Some("#ff0000".into()),
            stroke_width: Some(-3.0),
            font_size: Some(32.0),
            ..Default::default()
        };
        overrides.apply(&mut shape);
        assert_eq!(shape.style.fill, "#ff0000");
        assert_eq!(shape.style.stroke_width, 0.0);
        assert_eq!(shape.as_text().map(|t| t.font_size), Some(32.0));
    }

    #[test]
    fn test_accessors_match_kind() {
        let shape = Shape::new(Geometry::Circle(Circle::new(Point::new(1.0, 2.0), 3.0)));
        assert!(shape.as_circle().is_some());
        assert!(shape.as_rectangle().is_none());
        assert_eq!(shape.kind(), ShapeKind::Circle);
    }

    #[test]
    fn test_regenerate_id_keeps_content() {
        let shape = Shape::new(Geometry::Rectangle(Rectangle::new(Point::ZERO, 5.0, 5.0)));
        let mut copy = shape.clone();
        copy.regenerate_id();
        assert_ne!(shape.id(), copy.id());
        assert!(shape.same_content(&copy));
    }

    #[test]
    fn test_hit_test_rotated_rectangle() {
        let mut shape = Shape::new(Geometry::Rectangle(Rectangle::new(Point::ZERO, 100.0, 10.0)));
        shape.style.fill = "#000".into();
        assert!(shape.hit_test(Point::new(90.0, 5.0), 0.0));
        shape.set_rotation(90.0);
        // Rotated about (50, 5): the long axis is now vertical.
        assert!(!shape.hit_test(Point::new(90.0, 5.0), 0.0));
        assert!(shape.hit_test(Point::new(50.0, 45.0), 0.0));
    }

    #[test]
    fn test_segment_distance() {
        let d = point_to_segment_dist(Point::new(5.0, 5.0), Point::ZERO, Point::new(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-9);
    }
}
