//! Bounding boxes and selection handles.

use crate::handles::{Handle, HandleKind, HandleShape};
use crate::shapes::{Shape, envelope};
use crate::transform::rotate_about;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Distance of the rotation handle above the top edge.
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// Canvas-space bounding box of a shape.
///
/// `center_x`/`center_y` is always the centre of the unrotated box, even when
/// the box itself was expanded to enclose the rotated shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub center_x: f64,
    pub center_y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
}

impl Bounds {
    pub fn from_rect(rect: Rect, rotation: f64) -> Self {
        let center = rect.center();
        Self {
            x: rect.x0,
            y: rect.y0,
            width: rect.width(),
            height: rect.height(),
            center_x: center.x,
            center_y: center.y,
            rotation,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// Corners clockwise from the top-left.
    pub fn corners(&self) -> [Point; 4] {
        let r = self.rect();
        [
            Point::new(r.x0, r.y0),
            Point::new(r.x1, r.y0),
            Point::new(r.x1, r.y1),
            Point::new(r.x0, r.y1),
        ]
    }

    /// Corners turned about the centre by `rotation`, in [`Bounds::corners`] order.
    pub fn rotated_corners(&self) -> [Point; 4] {
        let center = self.center();
        self.corners().map(|c| rotate_about(c, center, self.rotation))
    }

    pub fn contains(&self, point: Point) -> bool {
        self.rect().contains(point)
    }
}

/// Compute the canvas bounds of a shape.
///
/// The local box is shifted by the shape's translation. With
/// `include_rotation` and a nonzero rotation the result is the envelope of the
/// rotated corners; the reported centre and rotation stay those of the
/// unrotated box. Returns `None` for geometry without a box.
pub fn compute_bounds(shape: &Shape, include_rotation: bool) -> Option<Bounds> {
    let local = shape.local_bounds()?;
    let rect = local + shape.transform.translation();
    let rotation = shape.rotation();
    let mut bounds = Bounds::from_rect(rect, rotation);

    if include_rotation && rotation != 0.0 {
        if let Some(env) = envelope(bounds.rotated_corners()) {
            bounds.x = env.x0;
            bounds.y = env.y0;
            bounds.width = env.width();
            bounds.height = env.height();
        }
    }

    Some(bounds)
}

/// Compute the eight perimeter handles and the rotation handle for unrotated
/// `bounds`, all turned about the centre by `bounds.rotation`.
pub fn compute_resize_handles(bounds: &Bounds) -> Vec<Handle> {
    let rect = bounds.rect();
    let center = bounds.center();
    let place = |p: Point| rotate_about(p, center, bounds.rotation);

    let mut handles: Vec<Handle> = HandleKind::PERIMETER
        .iter()
        .filter_map(|&kind| {
            let (u, v) = kind.unit_position()?;
            let p = Point::new(rect.x0 + rect.width() * u, rect.y0 + rect.height() * v);
            Some(Handle::new(kind, place(p)))
        })
        .collect();

    let top_center = Point::new(center.x, rect.y0 - ROTATE_HANDLE_OFFSET);
    handles.push(Handle::new(HandleKind::Rotate, place(top_center)).with_shape(HandleShape::Circle));
    handles
}

/// Canvas positions of a line's endpoints, if the shape is a line.
pub fn line_endpoints(shape: &Shape) -> Option<(Point, Point)> {
    let line = shape.as_line()?;
    let pivot = shape.local_bounds()?.center();
    Some((
        shape.transform.local_to_canvas(line.start, pivot),
        shape.transform.local_to_canvas(line.end, pivot),
    ))
}

/// Handles offered for a selected shape.
///
/// Lines get endpoint handles; rectangles, circles and ellipses get the
/// perimeter handles. Every shape gets a rotation handle.
pub fn shape_handles(shape: &Shape) -> Vec<Handle> {
    use crate::shapes::ShapeKind;

    let Some(bounds) = compute_bounds(shape, false) else {
        return Vec::new();
    };
    match shape.kind() {
        ShapeKind::Rectangle | ShapeKind::Circle | ShapeKind::Ellipse => compute_resize_handles(&bounds),
        ShapeKind::Line => {
            let mut handles = Vec::with_capacity(3);
            if let Some((start, end)) = line_endpoints(shape) {
                handles.push(Handle::new(HandleKind::Start, start).with_shape(HandleShape::Circle));
                handles.push(Handle::new(HandleKind::End, end).with_shape(HandleShape::Circle));
            }
            handles.extend(
                compute_resize_handles(&bounds)
                    .into_iter()
                    .filter(|h| h.kind == HandleKind::Rotate),
            );
            handles
        }
        ShapeKind::Text | ShapeKind::Path => compute_resize_handles(&bounds)
            .into_iter()
            .filter(|h| h.kind == HandleKind::Rotate)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Ellipse, Geometry, Line, PathShape, Rectangle, Text};
    use crate::transform::ShapeTransform;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_rectangle_bounds_with_translation() {
        let mut shape = Shape::new(Geometry::Rectangle(Rectangle::new(Point::new(10.0, 20.0), 100.0, 50.0)));
        shape.transform = ShapeTransform::new(5.0, -5.0, 0.0);
        let b = compute_bounds(&shape, true).unwrap();
        assert_eq!((b.x, b.y, b.width, b.height), (15.0, 15.0, 100.0, 50.0));
        assert_eq!((b.center_x, b.center_y), (65.0, 40.0));
    }

    #[test]
    fn test_rotated_bounds_envelope() {
        let mut shape = Shape::new(Geometry::Rectangle(Rectangle::new(Point::ZERO, 100.0, 50.0)));
        shape.set_rotation(90.0);
        let b = compute_bounds(&shape, true).unwrap();
        assert!(approx(b.width, 50.0));
        assert!(approx(b.height, 100.0));
        assert!(approx(b.center_x, 50.0));
        assert!(approx(b.center_y, 25.0));
        assert_eq!(b.rotation, 90.0);

        let unrotated = compute_bounds(&shape, false).unwrap();
        assert_eq!(unrotated.width, 100.0);
    }

    #[test]
    fn test_rotation_round_trip() {
        let mut shape = Shape::new(Geometry::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 80.0, 30.0)));
        shape.transform = ShapeTransform::new(15.0, -5.0, 0.0);
        let unrotated = compute_bounds(&shape, false).unwrap();
        let center = unrotated.center();

        for target in [Point::new(140.0, 95.0), Point::new(-20.0, 40.0), Point::new(60.0, -80.0)] {
            let theta = crate::manipulate::rotate(&mut shape, target, false).unwrap();
            assert_ne!(theta, 0.0);

            let aware = compute_bounds(&shape, true).unwrap();
            assert!(approx(aware.center_x, center.x) && approx(aware.center_y, center.y));
            assert_eq!(aware.rotation, theta);

            let corners = compute_bounds(&shape, false).unwrap().rotated_corners();
            let env = envelope(corners).unwrap();
            assert!(approx(env.x0, aware.x) && approx(env.y0, aware.y));
            assert!(approx(env.width(), aware.width) && approx(env.height(), aware.height));

            for (corner, original) in corners.into_iter().zip(unrotated.corners()) {
                let back = rotate_about(corner, aware.center(), -theta);
                assert!(approx(back.x, original.x) && approx(back.y, original.y), "{:?} vs {:?}", back, original);
            }
        }
    }

    #[test]
    fn test_fresh_shapes_have_zero_size_at_start() {
        let start = Point::new(42.0, 17.0);
        let shapes = [
            Geometry::Rectangle(Rectangle::new(start, 0.0, 0.0)),
            Geometry::Circle(Circle::new(start, 0.0)),
            Geometry::Ellipse(Ellipse::new(start, 0.0, 0.0)),
            Geometry::Line(Line::new(start, start)),
            Geometry::Text(Text::new(start, "")),
            Geometry::Path(PathShape::starting_at(start)),
        ];
        for geometry in shapes {
            let b = compute_bounds(&Shape::new(geometry), true).unwrap();
            assert_eq!((b.x, b.y, b.width, b.height), (42.0, 17.0, 0.0, 0.0));
        }
    }

    #[test]
    fn test_path_without_points_has_no_bounds() {
        let shape = Shape::new(Geometry::Path(PathShape::new("")));
        assert!(compute_bounds(&shape, true).is_none());
        assert!(shape_handles(&shape).is_empty());
    }

    #[test]
    fn test_resize_handles_positions() {
        let bounds = Bounds::from_rect(Rect::new(0.0, 0.0, 100.0, 50.0), 0.0);
        let handles = compute_resize_handles(&bounds);
        assert_eq!(handles.len(), 9);
        let find = |kind| handles.iter().find(|h| h.kind == kind).unwrap().position;
        assert_eq!(find(HandleKind::NorthWest), Point::new(0.0, 0.0));
        assert_eq!(find(HandleKind::East), Point::new(100.0, 25.0));
        assert_eq!(find(HandleKind::South), Point::new(50.0, 50.0));
        assert_eq!(find(HandleKind::Rotate), Point::new(50.0, -ROTATE_HANDLE_OFFSET));
    }

    #[test]
    fn test_resize_handles_follow_rotation() {
        let bounds = Bounds::from_rect(Rect::new(0.0, 0.0, 100.0, 100.0), 180.0);
        let handles = compute_resize_handles(&bounds);
        let nw = handles.iter().find(|h| h.kind == HandleKind::NorthWest).unwrap();
        assert!(approx(nw.position.x, 100.0) && approx(nw.position.y, 100.0));
        let rotate = handles.iter().find(|h| h.kind == HandleKind::Rotate).unwrap();
        assert!(approx(rotate.position.y, 100.0 + ROTATE_HANDLE_OFFSET));
    }

    #[test]
    fn test_line_handles() {
        let mut shape = Shape::new(Geometry::Line(Line::new(Point::ZERO, Point::new(10.0, 0.0))));
        shape.transform.translate_by(5.0, 5.0);
        let handles = shape_handles(&shape);
        let kinds: Vec<_> = handles.iter().map(|h| h.kind).collect();
        assert_eq!(kinds, vec![HandleKind::Start, HandleKind::End, HandleKind::Rotate]);
        assert_eq!(handles[1].position, Point::new(15.0, 5.0));
    }
}
