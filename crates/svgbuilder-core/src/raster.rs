//! PNG export using tiny-skia.
//!
//! Shapes are painted back to front onto a pixmap the size of the canvas with
//! the same composed transform the markup carries. Text is not rasterized.

use crate::canvas::Canvas;
use crate::shapes::{Geometry, Shape};
use thiserror::Error;
use tiny_skia::{Color, FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform};

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Cannot allocate a {width}x{height} image")]
    InvalidSize { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Parse a paint value. `None` for `none`, `transparent` and anything
/// unrecognized.
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    let rgb = match value.to_ascii_lowercase().as_str() {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "gray" | "grey" => (128, 128, 128),
        _ => return None,
    };
    Some(Color::from_rgba8(rgb.0, rgb.1, rgb.2, 255))
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, i) in rgb.iter_mut().zip(0..3) {
                let nibble = channel(&hex[i..i + 1])?;
                *slot = nibble * 17;
            }
            Some(Color::from_rgba8(rgb[0], rgb[1], rgb[2], 255))
        }
        6 | 8 => {
            let r = channel(&hex[0..2])?;
            let g = channel(&hex[2..4])?;
            let b = channel(&hex[4..6])?;
            let a = if hex.len() == 8 { channel(&hex[6..8])? } else { 255 };
            Some(Color::from_rgba8(r, g, b, a))
        }
        _ => None,
    }
}

/// Render the canvas to an RGBA pixmap, scaled by `scale`.
pub fn render(canvas: &Canvas, scale: f64) -> Result<Pixmap, RasterError> {
    let width = (canvas.width * scale).round().max(1.0) as u32;
    let height = (canvas.height * scale).round().max(1.0) as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or(RasterError::InvalidSize { width, height })?;
    if let Some(background) = parse_color(&canvas.background) {
        pixmap.fill(background);
    }

    let view = Transform::from_scale(scale as f32, scale as f32);
    for shape in canvas.shapes() {
        paint_shape(&mut pixmap, shape, view);
    }
    Ok(pixmap)
}

/// Render the canvas and encode it as PNG bytes.
pub fn render_png(canvas: &Canvas, scale: f64) -> Result<Vec<u8>, RasterError> {
    let pixmap = render(canvas, scale)?;
    pixmap.encode_png().map_err(|e| RasterError::Encode(e.to_string()))
}

fn shape_transform(shape: &Shape) -> Transform {
    let t = &shape.transform;
    let pivot = shape.local_bounds().map(|r| r.center()).unwrap_or_default();
    Transform::from_translate(t.translate_x as f32, t.translate_y as f32).pre_concat(
        Transform::from_rotate_at(t.rotation as f32, pivot.x as f32, pivot.y as f32),
    )
}

fn paint_shape(pixmap: &mut Pixmap, shape: &Shape, view: Transform) {
    let Some(path) = build_path(shape.geometry()) else {
        return;
    };
    let transform = view.pre_concat(shape_transform(shape));

    let closed = !matches!(shape.geometry(), Geometry::Line(_));
    if closed && shape.style.is_filled() {
        if let Some(color) = parse_color(&shape.style.fill) {
            let mut paint = Paint::default();
            paint.set_color(color);
            paint.anti_alias = true;
            pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
        }
    }

    if shape.style.stroke_width > 0.0 {
        if let Some(color) = parse_color(&shape.style.stroke) {
            let mut paint = Paint::default();
            paint.set_color(color);
            paint.anti_alias = true;
            let stroke = Stroke {
                width: shape.style.stroke_width as f32,
                ..Default::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, transform, None);
        }
    }
}

fn build_path(geometry: &Geometry) -> Option<Path> {
    match geometry {
        Geometry::Rectangle(rect) => {
            let (x, y) = (rect.position.x as f32, rect.position.y as f32);
            let (w, h) = (rect.width as f32, rect.height as f32);
            let rx = (rect.corner_radius_x as f32).clamp(0.0, w / 2.0);
            let ry = (rect.corner_radius_y as f32).clamp(0.0, h / 2.0);
            if rx <= 0.0 || ry <= 0.0 {
                return Some(PathBuilder::from_rect(Rect::from_xywh(x, y, w, h)?));
            }
            let mut pb = PathBuilder::new();
            pb.move_to(x + rx, y);
            pb.line_to(x + w - rx, y);
            pb.quad_to(x + w, y, x + w, y + ry);
            pb.line_to(x + w, y + h - ry);
            pb.quad_to(x + w, y + h, x + w - rx, y + h);
            pb.line_to(x + rx, y + h);
            pb.quad_to(x, y + h, x, y + h - ry);
            pb.line_to(x, y + ry);
            pb.quad_to(x, y, x + rx, y);
            pb.close();
            pb.finish()
        }
        Geometry::Circle(circle) => PathBuilder::from_circle(
            circle.center.x as f32,
            circle.center.y as f32,
            circle.radius as f32,
        ),
        Geometry::Ellipse(ellipse) => {
            let oval = Rect::from_xywh(
                (ellipse.center.x - ellipse.radius_x) as f32,
                (ellipse.center.y - ellipse.radius_y) as f32,
                (ellipse.radius_x * 2.0) as f32,
                (ellipse.radius_y * 2.0) as f32,
            )?;
            PathBuilder::from_oval(oval)
        }
        Geometry::Line(line) => {
            let mut pb = PathBuilder::new();
            pb.move_to(line.start.x as f32, line.start.y as f32);
            pb.line_to(line.end.x as f32, line.end.y as f32);
            pb.finish()
        }
        Geometry::Path(path) => {
            let mut pb = PathBuilder::new();
            for subpath in path.subpaths() {
                let mut points = subpath.points.iter();
                let Some(first) = points.next() else {
                    continue;
                };
                pb.move_to(first.x as f32, first.y as f32);
                for p in points {
                    pb.line_to(p.x as f32, p.y as f32);
                }
                if subpath.closed {
                    pb.close();
                }
            }
            pb.finish()
        }
        Geometry::Text(_) => None,
    }
}
