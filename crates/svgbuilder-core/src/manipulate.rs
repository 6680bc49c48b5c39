//! Move, resize and rotate operations on a single shape.
//!
//! Gestures operate on a working copy: the editor keeps the shape as it was at
//! pointer-down in a [`ManipulationState`] and recomputes the working copy from
//! it on every pointer move, so nothing accumulates between events.

use crate::bounds::compute_bounds;
use crate::handles::HandleKind;
use crate::shapes::{Shape, ShapeId, ShapeKind};
use crate::snap::{ANGLE_SNAP_INCREMENT, snap_angle};
use kurbo::{Point, Vec2};
use thiserror::Error;

/// Reasons a resize request cannot be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResizeError {
    #[error("{0} shapes cannot be resized with handles")]
    NotResizable(ShapeKind),
    #[error("the {0:?} handle does not apply to {1} shapes")]
    InvalidHandle(HandleKind, ShapeKind),
}

/// State of an active manipulation (single shape with handle).
#[derive(Debug, Clone)]
pub struct ManipulationState {
    /// The shape being manipulated.
    pub shape_id: ShapeId,
    /// The handle being dragged (None = moving the whole shape).
    pub handle: Option<HandleKind>,
    /// Fixed point of a resize, in the shape's local frame.
    pub anchor: Option<Point>,
    /// Starting point of the drag (canvas coordinates).
    pub start_point: Point,
    /// Current point of the drag (canvas coordinates).
    pub current_point: Point,
    /// Shape as it was when the gesture started.
    pub original_shape: Shape,
}

impl ManipulationState {
    pub fn new(handle: Option<HandleKind>, start_point: Point, original_shape: Shape) -> Self {
        let anchor = handle.and_then(|h| resize_anchor(&original_shape, h));
        Self {
            shape_id: original_shape.id(),
            handle,
            anchor,
            start_point,
            current_point: start_point,
            original_shape,
        }
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }
}

/// Translate a shape; rotation is untouched.
pub fn move_shape(shape: &mut Shape, dx: f64, dy: f64) {
    shape.transform.translate_by(dx, dy);
}

/// Local-frame point that stays fixed while `handle` is dragged.
///
/// For perimeter handles this is the opposite corner (or, for edge handles,
/// the corner the edge grows away from). Line endpoints anchor on the other
/// endpoint. `None` for the rotation handle and shapes without a box.
pub fn resize_anchor(shape: &Shape, handle: HandleKind) -> Option<Point> {
    if let Some(line) = shape.as_line() {
        return match handle {
            HandleKind::Start => Some(line.end),
            HandleKind::End => Some(line.start),
            _ => None,
        };
    }
    let r = shape.local_bounds()?;
    let anchor = match handle {
        HandleKind::NorthWest => Point::new(r.x1, r.y1),
        HandleKind::NorthEast => Point::new(r.x0, r.y1),
        HandleKind::SouthEast => Point::new(r.x0, r.y0),
        HandleKind::SouthWest => Point::new(r.x1, r.y0),
        HandleKind::North => Point::new(r.x0, r.y1),
        HandleKind::South | HandleKind::East => Point::new(r.x0, r.y0),
        HandleKind::West => Point::new(r.x1, r.y0),
        HandleKind::Start | HandleKind::End | HandleKind::Rotate => return None,
    };
    Some(anchor)
}

/// Resize a shape by dragging `handle` to the canvas point `current`.
///
/// `anchor` is the fixed local-frame point from [`resize_anchor`]. `current`
/// is mapped into the local frame through the shape's transform. When
/// `constrain` is set, rectangles keep the aspect ratio they had before this
/// call and ellipses become circular. The translation is adjusted so the
/// anchor stays put on the canvas even though the rotation pivot moves with
/// the new bounds.
pub fn resize(
    shape: &mut Shape,
    handle: HandleKind,
    anchor: Point,
    current: Point,
    constrain: bool,
) -> Result<(), ResizeError> {
    let kind = shape.kind();
    let Some(old_box) = shape.local_bounds() else {
        return Err(ResizeError::NotResizable(kind));
    };
    let old_pivot = old_box.center();
    let p = shape.transform.canvas_to_local(current, old_pivot);
    // Circles and ellipses resize about their centre; everything else keeps
    // the anchor fixed.
    let fixed_local = match kind {
        ShapeKind::Circle | ShapeKind::Ellipse => old_pivot,
        _ => anchor,
    };
    let fixed_canvas = shape.transform.local_to_canvas(fixed_local, old_pivot);

    match kind {
        ShapeKind::Rectangle => {
            if handle.unit_position().is_none() {
                return Err(ResizeError::InvalidHandle(handle, kind));
            }
            if let Some(rect) = shape.as_rectangle_mut() {
                resize_rectangle(rect, handle, anchor, p, constrain);
            }
        }
        ShapeKind::Circle => {
            if handle.unit_position().is_none() {
                return Err(ResizeError::InvalidHandle(handle, kind));
            }
            if let Some(circle) = shape.as_circle_mut() {
                circle.radius = circle.center.distance(p);
            }
        }
        ShapeKind::Ellipse => {
            if handle.unit_position().is_none() {
                return Err(ResizeError::InvalidHandle(handle, kind));
            }
            if let Some(ellipse) = shape.as_ellipse_mut() {
                let rx = (p.x - ellipse.center.x).abs();
                let ry = (p.y - ellipse.center.y).abs();
                let (rx, ry) = if constrain { (rx.max(ry), rx.max(ry)) } else { (rx, ry) };
                ellipse.radius_x = rx;
                ellipse.radius_y = ry;
            }
        }
        ShapeKind::Line => {
            let Some(line) = shape.as_line_mut() else {
                return Err(ResizeError::NotResizable(kind));
            };
            match handle {
                HandleKind::Start => line.start = p,
                HandleKind::End => line.end = p,
                _ => return Err(ResizeError::InvalidHandle(handle, kind)),
            }
        }
        ShapeKind::Text | ShapeKind::Path => return Err(ResizeError::NotResizable(kind)),
    }

    if let Some(new_box) = shape.local_bounds() {
        let moved = shape.transform.local_to_canvas(fixed_local, new_box.center());
        let drift = fixed_canvas - moved;
        shape.transform.translate_by(drift.x, drift.y);
    }
    Ok(())
}

fn resize_rectangle(
    rect: &mut crate::shapes::Rectangle,
    handle: HandleKind,
    anchor: Point,
    p: Point,
    constrain: bool,
) {
    let (orig_w, orig_h) = (rect.width, rect.height);
    let horizontal = handle.moves_west() || handle.moves_east();
    let vertical = handle.moves_north() || handle.moves_south();

    let mut w = if handle.moves_west() {
        (anchor.x - p.x).max(0.0)
    } else if handle.moves_east() {
        (p.x - anchor.x).max(0.0)
    } else {
        orig_w
    };
    let mut h = if handle.moves_north() {
        (anchor.y - p.y).max(0.0)
    } else if handle.moves_south() {
        (p.y - anchor.y).max(0.0)
    } else {
        orig_h
    };

    if constrain && orig_w > 0.0 && orig_h > 0.0 {
        let ratio = orig_w / orig_h;
        let width_dominates = match (horizontal, vertical) {
            (true, false) => true,
            (false, true) => false,
            _ => w / orig_w >= h / orig_h,
        };
        if width_dominates {
            h = w / ratio;
        } else {
            w = h * ratio;
        }
    }

    let x = if handle.moves_west() { anchor.x - w } else { anchor.x };
    let y = if handle.moves_north() { anchor.y - h } else { anchor.y };

    rect.position = Point::new(x, y);
    rect.width = w;
    rect.height = h;
}

/// Rotate a shape so it faces `current`.
///
/// The angle is measured with `atan2` from the centre of the shape's unrotated
/// canvas bounds, in degrees rounded to two decimals. With `snap` the angle is
/// rounded to the nearest 15°. Returns the new angle, or `None` when the shape
/// has no bounds.
pub fn rotate(shape: &mut Shape, current: Point, snap: bool) -> Option<f64> {
    let center = compute_bounds(shape, false)?.center();
    let mut angle = (current.y - center.y).atan2(current.x - center.x).to_degrees();
    if snap {
        angle = snap_angle(angle, ANGLE_SNAP_INCREMENT);
        if angle > 180.0 {
            angle -= 360.0;
        }
    }
    let angle = (angle * 100.0).round() / 100.0;
    shape.set_rotation(angle);
    Some(angle)
}

/// Render the shape's composed transform with its current bounds centre as
/// pivot, or `None` for the identity.
pub fn apply_transform(shape: &Shape) -> Option<String> {
    let pivot = shape.local_bounds()?.center();
    shape.transform.to_markup(pivot)
}
