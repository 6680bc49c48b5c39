//! Line shape.

use super::{GeometryTrait, ShapeStyle, point_to_segment_dist};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A straight line segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
}

impl Line {
    /// Create a new line.
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Get the length of the line.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Get the midpoint of the line.
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }
}

impl GeometryTrait for Line {
    fn local_bounds(&self) -> Option<Rect> {
        Some(Rect::from_points(self.start, self.end))
    }

    fn hit_test(&self, point: Point, tolerance: f64, style: &ShapeStyle) -> bool {
        point_to_segment_dist(point, self.start, self.end) <= tolerance + style.stroke_width / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        let mid = line.midpoint();
        assert!((mid.x - 50.0).abs() < f64::EPSILON);
        assert!((mid.y - 50.0).abs() < f64::EPSILON);
        assert!((line.length() - 100.0 * 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test_on_line() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let style = ShapeStyle::default();
        assert!(line.hit_test(Point::new(50.0, 0.0), 1.0, &style));
        assert!(line.hit_test(Point::new(50.0, 2.0), 5.0, &style));
        assert!(!line.hit_test(Point::new(50.0, 20.0), 5.0, &style));
    }

    #[test]
    fn test_bounds() {
        let line = Line::new(Point::new(50.0, 20.0), Point::new(10.0, 80.0));
        assert_eq!(line.local_bounds(), Some(Rect::new(10.0, 20.0, 50.0, 80.0)));
    }
}
