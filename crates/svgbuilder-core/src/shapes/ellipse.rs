//! Ellipse shape.

use super::{GeometryTrait, ShapeStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// An axis-aligned ellipse (before the shape's rotation is applied).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: Point,
    /// Half-width, the markup `rx`.
    pub radius_x: f64,
    /// Half-height, the markup `ry`.
    pub radius_y: f64,
}

impl Ellipse {
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            center,
            radius_x: radius_x.max(0.0),
            radius_y: radius_y.max(0.0),
        }
    }

    /// Ellipse inscribed in `rect`.
    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.center(), rect.width() / 2.0, rect.height() / 2.0)
    }

    /// `(x/rx)^2 + (y/ry)^2` for the point relative to the centre, with the
    /// radii grown (or shrunk) by `inflate`. `None` when a radius collapses.
    fn normalized(&self, point: Point, inflate: f64) -> Option<f64> {
        let rx = self.radius_x + inflate;
        let ry = self.radius_y + inflate;
        if rx < f64::EPSILON || ry < f64::EPSILON {
            return None;
        }
        let d = point - self.center;
        Some((d.x / rx).powi(2) + (d.y / ry).powi(2))
    }
}

impl GeometryTrait for Ellipse {
    fn local_bounds(&self) -> Option<Rect> {
        Some(Rect::from_center_size(
            self.center,
            (self.radius_x * 2.0, self.radius_y * 2.0),
        ))
    }

    fn hit_test(&self, point: Point, tolerance: f64, style: &ShapeStyle) -> bool {
        let reach = tolerance + style.stroke_width / 2.0;
        match self.normalized(point, reach) {
            Some(outer) if outer <= 1.0 => {}
            _ => return false,
        }
        if style.is_filled() || self.radius_x <= reach || self.radius_y <= reach {
            return true;
        }
        self.normalized(point, -reach).is_none_or(|inner| inner >= 1.0)
    }
}
