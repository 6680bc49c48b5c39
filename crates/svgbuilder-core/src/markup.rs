//! Markup (SVG text) serialization.
//!
//! [`to_markup`] writes a deterministic document: a root `<svg>` carrying the
//! canvas size and background, then one element per shape in z-order.
//! [`from_markup`] reads such a document back. Only direct children of the
//! root are considered; elements of unsupported kinds are skipped and
//! reported as warnings rather than failing the whole import.

use crate::shapes::{
    Circle, Ellipse, Geometry, Line, PathShape, Rectangle, Shape, ShapeKind, ShapeStyle, Text,
};
use crate::transform::ShapeTransform;
use kurbo::Point;
use std::fmt::Write as _;
use thiserror::Error;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Errors that abort an import. The canvas is left untouched.
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("invalid markup: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("expected an <svg> root element, found <{0}>")]
    MissingRoot(String),
}

/// Result of parsing a markup document.
#[derive(Debug, Clone, Default)]
pub struct Import {
    /// Shapes in document order, each with a fresh id.
    pub shapes: Vec<Shape>,
    /// Human readable notes about skipped or partially understood content.
    pub warnings: Vec<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub background: Option<String>,
}

/// Format a number for markup output.
///
/// Uses the shortest representation that parses back to the same value, so
/// integral values have no fractional part (`10`, not `10.0`).
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    // Avoid emitting "-0".
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

/// Escape text for use in an attribute value or element body.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize shapes to markup text.
pub fn to_markup(shapes: &[Shape], width: f64, height: f64, background: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="{}" width="{}" height="{}" style="background-color: {}">"#,
        SVG_NAMESPACE,
        format_number(width),
        format_number(height),
        escape(background)
    );
    for shape in shapes {
        out.push_str("  ");
        write_shape(&mut out, shape);
        out.push('\n');
    }
    out.push_str("</svg>\n");
    out
}

fn write_shape(out: &mut String, shape: &Shape) {
    let mut attrs: Vec<(&str, String)> = Vec::new();
    let num = |v: f64| format_number(v);

    match shape.geometry() {
        Geometry::Rectangle(r) => {
            attrs.push(("x", num(r.position.x)));
            attrs.push(("y", num(r.position.y)));
            attrs.push(("width", num(r.width)));
            attrs.push(("height", num(r.height)));
            if r.corner_radius_x != 0.0 {
                attrs.push(("rx", num(r.corner_radius_x)));
            }
            if r.corner_radius_y != 0.0 {
                attrs.push(("ry", num(r.corner_radius_y)));
            }
        }
        Geometry::Circle(c) => {
            attrs.push(("cx", num(c.center.x)));
            attrs.push(("cy", num(c.center.y)));
            attrs.push(("r", num(c.radius)));
        }
        Geometry::Ellipse(e) => {
            attrs.push(("cx", num(e.center.x)));
            attrs.push(("cy", num(e.center.y)));
            attrs.push(("rx", num(e.radius_x)));
            attrs.push(("ry", num(e.radius_y)));
        }
        Geometry::Line(l) => {
            attrs.push(("x1", num(l.start.x)));
            attrs.push(("y1", num(l.start.y)));
            attrs.push(("x2", num(l.end.x)));
            attrs.push(("y2", num(l.end.y)));
        }
        Geometry::Text(t) => {
            attrs.push(("x", num(t.position.x)));
            attrs.push(("y", num(t.position.y)));
            attrs.push(("font-size", num(t.font_size)));
            attrs.push(("font-family", t.font_family.clone()));
        }
        Geometry::Path(p) => {
            attrs.push(("d", p.d.clone()));
        }
    }

    attrs.push(("fill", shape.style.fill.clone()));
    attrs.push(("stroke", shape.style.stroke.clone()));
    attrs.push(("stroke-width", num(shape.style.stroke_width)));

    out.push('<');
    out.push_str(shape.kind().tag());
    for (name, value) in &attrs {
        let _ = write!(out, r#" {}="{}""#, name, escape(value));
    }
    for (name, value) in &shape.extra_attributes {
        let _ = write!(out, r#" {}="{}""#, name, escape(value));
    }
    let pivot = shape.local_bounds().map(|b| b.center()).unwrap_or(Point::ZERO);
    if let Some(transform) = shape.transform.to_markup(pivot) {
        let _ = write!(out, r#" transform="{}""#, escape(&transform));
    }

    match shape.text_content() {
        Some(content) => {
            let _ = write!(out, ">{}</{}>", escape(content), shape.kind().tag());
        }
        None => out.push_str("/>"),
    }
}

/// Parse markup text into shapes.
pub fn from_markup(text: &str) -> Result<Import, MarkupError> {
    let doc = roxmltree::Document::parse(text)?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(MarkupError::MissingRoot(root.tag_name().name().to_string()));
    }

    let mut import = Import {
        width: root.attribute("width").and_then(parse_number),
        height: root.attribute("height").and_then(parse_number),
        background: root.attribute("style").and_then(background_from_style),
        ..Default::default()
    };

    for node in root.children().filter(|n| n.is_element()) {
        let tag = node.tag_name().name();
        let Some(kind) = ShapeKind::from_tag(tag) else {
            log::warn!("skipping unsupported element <{}>", tag);
            import.warnings.push(format!("Unsupported element <{}> skipped", tag));
            continue;
        };
        match read_shape(node, kind, &mut import.warnings) {
            Ok(shape) => import.shapes.push(shape),
            Err(message) => {
                log::warn!("skipping <{}>: {}", tag, message);
                import.warnings.push(format!("<{}> skipped: {}", tag, message));
            }
        }
    }

    log::info!(
        "parsed {} shapes ({} warnings)",
        import.shapes.len(),
        import.warnings.len()
    );
    Ok(import)
}

/// Attributes consumed by the model for each kind; everything else is kept verbatim.
fn modelled_attributes(kind: ShapeKind) -> &'static [&'static str] {
    match kind {
        ShapeKind::Rectangle => &["x", "y", "width", "height", "rx", "ry"],
        ShapeKind::Circle => &["cx", "cy", "r"],
        ShapeKind::Ellipse => &["cx", "cy", "rx", "ry"],
        ShapeKind::Line => &["x1", "y1", "x2", "y2"],
        ShapeKind::Text => &["x", "y", "font-size", "font-family"],
        ShapeKind::Path => &["d"],
    }
}

const COMMON_ATTRIBUTES: [&str; 5] = ["id", "fill", "stroke", "stroke-width", "transform"];

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

fn read_shape(
    node: roxmltree::Node<'_, '_>,
    kind: ShapeKind,
    warnings: &mut Vec<String>,
) -> Result<Shape, String> {
    let num = |name: &str, default: f64| -> Result<f64, String> {
        match node.attribute(name) {
            None => Ok(default),
            Some(raw) => parse_number(raw).ok_or_else(|| format!("invalid {} {:?}", name, raw)),
        }
    };

    let geometry = match kind {
        ShapeKind::Rectangle => {
            let mut rect = Rectangle::new(
                Point::new(num("x", 0.0)?, num("y", 0.0)?),
                num("width", 0.0)?,
                num("height", 0.0)?,
            );
            rect.corner_radius_x = num("rx", 0.0)?.max(0.0);
            rect.corner_radius_y = num("ry", 0.0)?.max(0.0);
            Geometry::Rectangle(rect)
        }
        ShapeKind::Circle => Geometry::Circle(Circle::new(
            Point::new(num("cx", 0.0)?, num("cy", 0.0)?),
            num("r", 0.0)?,
        )),
        ShapeKind::Ellipse => Geometry::Ellipse(Ellipse::new(
            Point::new(num("cx", 0.0)?, num("cy", 0.0)?),
            num("rx", 0.0)?,
            num("ry", 0.0)?,
        )),
        ShapeKind::Line => Geometry::Line(Line::new(
            Point::new(num("x1", 0.0)?, num("y1", 0.0)?),
            Point::new(num("x2", 0.0)?, num("y2", 0.0)?),
        )),
        ShapeKind::Text => {
            let content: String = node
                .descendants()
                .filter(|n| n.is_text())
                .filter_map(|n| n.text())
                .collect();
            let mut text = Text::new(Point::new(num("x", 0.0)?, num("y", 0.0)?), content);
            text.font_size = num("font-size", text.font_size)?.max(0.0);
            if let Some(family) = node.attribute("font-family") {
                text.font_family = family.to_string();
            }
            Geometry::Text(text)
        }
        ShapeKind::Path => Geometry::Path(PathShape::new(node.attribute("d").unwrap_or_default())),
    };

    let defaults = ShapeStyle::default();
    let style = ShapeStyle {
        fill: node.attribute("fill").map_or(defaults.fill, str::to_string),
        stroke: node.attribute("stroke").map_or(defaults.stroke, str::to_string),
        stroke_width: num("stroke-width", defaults.stroke_width)?.max(0.0),
    };

    let mut shape = Shape::new(geometry).with_style(style);

    if let Some(raw) = node.attribute("transform") {
        let (transform, issues) = ShapeTransform::parse(raw);
        shape.transform = transform;
        for issue in issues {
            warnings.push(format!("{} on <{}> ignored", issue, kind.tag()));
        }
    }

    let modelled = modelled_attributes(kind);
    for attr in node.attributes() {
        let name = attr.name();
        match attr.namespace() {
            None if COMMON_ATTRIBUTES.contains(&name) || modelled.contains(&name) => {}
            None => shape
                .extra_attributes
                .push((name.to_string(), attr.value().to_string())),
            // The `xml` prefix is bound in every document, so it survives export.
            Some(XML_NAMESPACE) => shape
                .extra_attributes
                .push((format!("xml:{}", name), attr.value().to_string())),
            Some(uri) => {
                let qualified = match node.lookup_prefix(uri) {
                    Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, name),
                    _ => format!("{{{}}}{}", uri, name),
                };
                log::warn!("dropping namespaced attribute {} on <{}>", qualified, kind.tag());
                warnings.push(format!(
                    "Namespaced attribute {} on <{}> dropped",
                    qualified,
                    kind.tag()
                ));
            }
        }
    }

    Ok(shape)
}

/// Parse a markup length, accepting an optional `px` unit.
fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix("px").unwrap_or(trimmed).trim_end();
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn background_from_style(style: &str) -> Option<String> {
    style.split(';').find_map(|decl| {
        let (key, value) = decl.split_once(':')?;
        (key.trim() == "background-color").then(|| value.trim().to_string())
    })
}
