//! Selection and derived handle geometry.
//!
//! Only the selected id is stored. Bounds and handles are recomputed from the
//! canvas on every query so they can never go stale.

use crate::bounds::{Bounds, compute_bounds, shape_handles};
use crate::canvas::Canvas;
use crate::handles::{Handle, HandleKind};
use crate::shapes::ShapeId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Current selection (at most one shape).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    selected: Option<ShapeId>,
}

impl Selection {
    pub fn id(&self) -> Option<ShapeId> {
        self.selected
    }

    pub fn select(&mut self, id: ShapeId) {
        self.selected = Some(id);
    }

    pub fn set(&mut self, id: Option<ShapeId>) {
        self.selected = id;
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Drop the selection if the shape no longer exists.
    pub fn prune(&mut self, canvas: &Canvas) {
        if self.selected.is_some_and(|id| !canvas.contains(id)) {
            self.selected = None;
        }
    }

    /// Unrotated bounds of the selected shape.
    pub fn bounds(&self, canvas: &Canvas) -> Option<Bounds> {
        compute_bounds(canvas.get(self.selected?)?, false)
    }

    /// Handles for the selected shape.
    pub fn handles(&self, canvas: &Canvas) -> Vec<Handle> {
        self.selected
            .and_then(|id| canvas.get(id))
            .map(shape_handles)
            .unwrap_or_default()
    }

    /// Find which handle (if any) is hit at the given point.
    pub fn hit_handle(&self, canvas: &Canvas, point: Point, tolerance: f64) -> Option<HandleKind> {
        self.handles(canvas)
            .into_iter()
            .find(|h| h.hit_test(point, tolerance))
            .map(|h| h.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Geometry, Rectangle, Shape};

    #[test]
    fn test_selection_derives_from_canvas() {
        let mut canvas = Canvas::default();
        let id = canvas.add(Shape::new(Geometry::Rectangle(Rectangle::new(Point::ZERO, 100.0, 50.0))));
        let mut selection = Selection::default();
        assert!(selection.handles(&canvas).is_empty());

        selection.select(id);
        assert_eq!(selection.bounds(&canvas).map(|b| b.width), Some(100.0));
        assert_eq!(selection.handles(&canvas).len(), 9);

        if let Some(rect) = canvas.get_mut(id).and_then(Shape::as_rectangle_mut) {
            rect.width = 200.0;
        }
        assert_eq!(selection.bounds(&canvas).map(|b| b.width), Some(200.0));
    }

    #[test]
    fn test_hit_handle() {
        let mut canvas = Canvas::default();
        let id = canvas.add(Shape::new(Geometry::Rectangle(Rectangle::new(Point::ZERO, 100.0, 50.0))));
        let mut selection = Selection::default();
        selection.select(id);
        assert_eq!(selection.hit_handle(&canvas, Point::new(101.0, 49.0), 5.0), Some(HandleKind::SouthEast));
        assert_eq!(selection.hit_handle(&canvas, Point::new(50.0, -25.0), 5.0), Some(HandleKind::Rotate));
        assert_eq!(selection.hit_handle(&canvas, Point::new(50.0, 25.0), 5.0), None);
    }

    #[test]
    fn test_prune_removed_shape() {
        let mut canvas = Canvas::default();
        let id = canvas.add(Shape::new(Geometry::Rectangle(Rectangle::new(Point::ZERO, 1.0, 1.0))));
        let mut selection = Selection::default();
        selection.select(id);
        canvas.remove(id);
        selection.prune(&canvas);
        assert_eq!(selection.id(), None);
    }
}
