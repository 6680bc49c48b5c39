//! Circle shape.

use super::{GeometryTrait, ShapeStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A circle given by centre and radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }
}

impl GeometryTrait for Circle {
    fn local_bounds(&self) -> Option<Rect> {
        Some(Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        ))
    }

    fn hit_test(&self, point: Point, tolerance: f64, style: &ShapeStyle) -> bool {
        let dist = point.distance(self.center);
        let band = tolerance + style.stroke_width / 2.0;
        if style.is_filled() {
            dist <= self.radius + band
        } else {
            (dist - self.radius).abs() <= band
        }
    }
}
