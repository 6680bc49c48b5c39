//! View transform between host pointer coordinates and canvas coordinates.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Pan offset plus uniform zoom. A point on the canvas lands on screen at
/// `canvas * zoom + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Pan, in screen units.
    pub offset: Vec2,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas to screen.
    pub fn view_affine(&self) -> Affine {
        Affine::scale(self.zoom).then_translate(self.offset)
    }

    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        ((screen - self.offset).to_vec2() / self.zoom).to_point()
    }

    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        self.view_affine() * canvas
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Multiply the zoom by `factor` (clamped to [`MIN_ZOOM`], [`MAX_ZOOM`])
    /// around `anchor`, so the canvas point under the anchor stays put.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let pinned = self.screen_to_canvas(anchor);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.offset = anchor.to_vec2() - pinned.to_vec2() * self.zoom;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn test_pan_then_zoom_maps_points() {
        let mut camera = Camera::new();
        assert_eq!(camera.screen_to_canvas(Point::new(7.0, 9.0)), Point::new(7.0, 9.0));

        camera.pan(Vec2::new(40.0, -10.0));
        camera.zoom = 4.0;
        assert!(close(camera.screen_to_canvas(Point::new(80.0, 30.0)), Point::new(10.0, 10.0)));
        assert!(close(camera.canvas_to_screen(Point::new(10.0, 10.0)), Point::new(80.0, 30.0)));
    }

    #[test]
    fn test_zoom_at_pins_anchor() {
        let mut camera = Camera {
            offset: Vec2::new(-25.0, 60.0),
            zoom: 0.5,
        };
        let anchor = Point::new(320.0, 240.0);
        let pinned = camera.screen_to_canvas(anchor);
        camera.zoom_at(anchor, 3.0);
        assert!((camera.zoom - 1.5).abs() < 1e-12);
        assert!(close(camera.screen_to_canvas(anchor), pinned));
    }

    #[test]
    fn test_zoom_limits_and_reset() {
        let mut camera = Camera::new();
        camera.zoom_at(Point::ZERO, 1e-6);
        assert_eq!(camera.zoom, MIN_ZOOM);
        camera.zoom_at(Point::new(5.0, 5.0), 1e6);
        assert_eq!(camera.zoom, MAX_ZOOM);
        camera.zoom_at(Point::ZERO, f64::NAN);
        assert_eq!(camera.zoom, MAX_ZOOM);

        camera.reset();
        assert_eq!(camera, Camera::default());
    }
}
