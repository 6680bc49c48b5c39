//! Rectangle shape.

use super::{GeometryTrait, ShapeStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle with optional rounded corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Top-left corner position.
    pub position: Point,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
    /// Horizontal corner radius (0 = sharp corners).
    #[serde(default)]
    pub corner_radius_x: f64,
    /// Vertical corner radius (0 = sharp corners).
    #[serde(default)]
    pub corner_radius_y: f64,
}

impl Rectangle {
    /// Create a new rectangle. Negative sizes are clamped to zero.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            position,
            width: width.max(0.0),
            height: height.max(0.0),
            corner_radius_x: 0.0,
            corner_radius_y: 0.0,
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let rect = Rect::from_points(p1, p2);
        Self::new(Point::new(rect.x0, rect.y0), rect.width(), rect.height())
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }
}

impl GeometryTrait for Rectangle {
    fn local_bounds(&self) -> Option<Rect> {
        Some(self.as_rect())
    }

    fn hit_test(&self, point: Point, tolerance: f64, style: &ShapeStyle) -> bool {
        let rect = self.as_rect();
        if style.is_filled() {
            rect.inflate(tolerance, tolerance).contains(point)
        } else {
            let band = tolerance + style.stroke_width / 2.0;
            let outer = rect.inflate(band, band);
            let inner = rect.inflate(-band, -band);
            // An inverted inner rect (thin shapes) contains nothing.
            outer.contains(point) && !inner.contains(point)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_from_corners() {
        let rect = Rectangle::from_corners(Point::new(100.0, 100.0), Point::new(50.0, 50.0));
        assert!((rect.position.x - 50.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 50.0).abs() < f64::EPSILON);
        assert!((rect.width - 50.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_size_clamped() {
        let rect = Rectangle::new(Point::ZERO, -5.0, 3.0);
        assert_eq!(rect.width, 0.0);
        assert_eq!(rect.height, 3.0);
    }

    #[test]
    fn test_hit_test_outline_only() {
        let rect = Rectangle::new(Point::ZERO, 100.0, 100.0);
        let style = ShapeStyle::default();
        assert!(rect.hit_test(Point::new(0.0, 50.0), 2.0, &style));
        assert!(!rect.hit_test(Point::new(50.0, 50.0), 2.0, &style));
    }

    #[test]
    fn test_hit_test_filled() {
        let rect = Rectangle::new(Point::ZERO, 100.0, 100.0);
        let style = ShapeStyle {
            fill: "#ffcc00".into(),
            ..ShapeStyle::default()
        };
        assert!(rect.hit_test(Point::new(50.0, 50.0), 0.0, &style));
        assert!(!rect.hit_test(Point::new(150.0, 50.0), 0.0, &style));
    }
}
