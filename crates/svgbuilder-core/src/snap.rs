//! Grid and angle snapping.

use crate::shapes::Shape;
use kurbo::Point;

/// Default grid size for snapping (matches the visual grid).
pub const GRID_SIZE: f64 = 20.0;

/// Angle snap increment in degrees for constrained rotation.
pub const ANGLE_SNAP_INCREMENT: f64 = 15.0;

/// Angle snap increment in degrees for constrained line drawing.
pub const LINE_ANGLE_INCREMENT: f64 = 45.0;

/// Snap a single value to the nearest multiple of `grid_size`.
///
/// A non-positive grid size disables snapping.
pub fn snap_value(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 || !grid_size.is_finite() {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap a point to the nearest grid intersection.
pub fn snap_point(point: Point, grid_size: f64) -> Point {
    Point::new(snap_value(point.x, grid_size), snap_value(point.y, grid_size))
}

/// Copy of `shape` with its positional and dimensional attributes snapped.
///
/// Path geometry is returned unchanged.
pub fn snap_shape(shape: &Shape, grid_size: f64) -> Shape {
    let mut snapped = shape.clone();
    let snap = |v: f64| snap_value(v, grid_size);

    if let Some(rect) = snapped.as_rectangle_mut() {
        rect.position = snap_point(rect.position, grid_size);
        rect.width = snap(rect.width).max(0.0);
        rect.height = snap(rect.height).max(0.0);
    } else if let Some(circle) = snapped.as_circle_mut() {
        circle.center = snap_point(circle.center, grid_size);
        circle.radius = snap(circle.radius).max(0.0);
    } else if let Some(ellipse) = snapped.as_ellipse_mut() {
        ellipse.center = snap_point(ellipse.center, grid_size);
        ellipse.radius_x = snap(ellipse.radius_x).max(0.0);
        ellipse.radius_y = snap(ellipse.radius_y).max(0.0);
    } else if let Some(line) = snapped.as_line_mut() {
        line.start = snap_point(line.start, grid_size);
        line.end = snap_point(line.end, grid_size);
    } else if let Some(text) = snapped.as_text_mut() {
        text.position = snap_point(text.position, grid_size);
    }

    snapped
}

/// Snap an angle to the nearest increment.
/// Returns the snapped angle in degrees (0-360).
pub fn snap_angle(angle_degrees: f64, increment: f64) -> f64 {
    let snapped = (angle_degrees / increment).round() * increment;
    snapped.rem_euclid(360.0)
}

/// Snap a line endpoint to angle increments from a start point.
/// This snaps the angle while preserving the distance from start.
pub fn snap_line_endpoint(start: Point, end: Point, increment: f64) -> Point {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let distance = dx.hypot(dy);

    // Handle zero-length case
    if distance < 0.001 {
        return end;
    }

    let snapped = snap_angle(dy.atan2(dx).to_degrees(), increment).to_radians();
    Point::new(
        start.x + distance * snapped.cos(),
        start.y + distance * snapped.sin(),
    )
}
