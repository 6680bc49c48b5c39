//! Canvas document: ordered shapes plus page size and background.

use crate::markup;
use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: f64 = 800.0;
pub const DEFAULT_HEIGHT: f64 = 600.0;
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// A canvas containing shapes in z-order (back to front).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    shapes: Vec<Shape>,
    pub width: f64,
    pub height: f64,
    pub background: String,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_BACKGROUND)
    }
}

impl Canvas {
    pub fn new(width: f64, height: f64, background: impl Into<String>) -> Self {
        Self {
            shapes: Vec::new(),
            width: width.max(0.0),
            height: height.max(0.0),
            background: background.into(),
        }
    }

    /// Shapes back to front.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id() == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    /// Add a shape on top. A shape whose id is already present gets a fresh one.
    pub fn add(&mut self, mut shape: Shape) -> ShapeId {
        if self.contains(shape.id()) {
            shape.regenerate_id();
        }
        let id = shape.id();
        self.shapes.push(shape);
        id
    }

    /// Replace the stored shape with the same id. Returns false if absent.
    pub fn replace(&mut self, shape: Shape) -> bool {
        match self.get_mut(shape.id()) {
            Some(slot) => {
                *slot = shape;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.index_of(id)?;
        Some(self.shapes.remove(index))
    }

    /// Remove all shapes. Size and background are kept.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Replace every shape, e.g. from a history snapshot.
    pub fn set_shapes(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
    }

    /// Topmost shape hit at `point`.
    pub fn shape_at(&self, point: Point, tolerance: f64) -> Option<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .find(|s| s.hit_test(point, tolerance))
            .map(Shape::id)
    }

    /// Union of every shape's rotation-aware bounds.
    pub fn content_bounds(&self) -> Option<Rect> {
        self.shapes
            .iter()
            .filter_map(|s| crate::bounds::compute_bounds(s, true))
            .map(|b| b.rect())
            .reduce(|a, b| a.union(b))
    }

    /// Bring a shape to the front (topmost). Returns false if absent or already there.
    pub fn bring_to_front(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos + 1 < self.shapes.len() => {
                let shape = self.shapes.remove(pos);
                self.shapes.push(shape);
                true
            }
            _ => false,
        }
    }

    /// Send a shape to the back (bottommost). Returns false if absent or already there.
    pub fn send_to_back(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos > 0 => {
                let shape = self.shapes.remove(pos);
                self.shapes.insert(0, shape);
                true
            }
            _ => false,
        }
    }

    /// Move a shape one layer forward (towards front).
    pub fn bring_forward(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos + 1 < self.shapes.len() => {
                self.shapes.swap(pos, pos + 1);
                true
            }
            _ => false,
        }
    }

    /// Move a shape one layer backward (towards back).
    pub fn send_backward(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos > 0 => {
                self.shapes.swap(pos, pos - 1);
                true
            }
            _ => false,
        }
    }

    /// Serialize to markup text.
    pub fn to_markup(&self) -> String {
        markup::to_markup(&self.shapes, self.width, self.height, &self.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Geometry, Rectangle};

    fn rect(x: f64) -> Shape {
        let mut shape = Shape::new(Geometry::Rectangle(Rectangle::new(Point::new(x, 0.0), 10.0, 10.0)));
        shape.style.fill = "#cccccc".into();
        shape
    }

    fn ids(canvas: &Canvas) -> Vec<ShapeId> {
        canvas.shapes().iter().map(Shape::id).collect()
    }

    #[test]
    fn test_add_and_remove() {
        let mut canvas = Canvas::default();
        let id = canvas.add(rect(0.0));
        assert_eq!(canvas.len(), 1);
        assert!(canvas.get(id).is_some());
        assert!(canvas.remove(id).is_some());
        assert!(canvas.is_empty());
        assert!(canvas.remove(id).is_none());
    }

    #[test]
    fn test_duplicate_id_regenerated() {
        let mut canvas = Canvas::default();
        let shape = rect(0.0);
        let first = canvas.add(shape.clone());
        let second = canvas.add(shape);
        assert_ne!(first, second);
    }

    #[test]
    fn test_z_order() {
        let mut canvas = Canvas::default();
        let a = canvas.add(rect(0.0));
        let b = canvas.add(rect(0.0));
        let c = canvas.add(rect(0.0));

        assert!(canvas.bring_to_front(a));
        assert_eq!(ids(&canvas), vec![b, c, a]);
        assert!(!canvas.bring_to_front(a));

        assert!(canvas.send_to_back(a));
        assert_eq!(ids(&canvas), vec![a, b, c]);

        assert!(canvas.bring_forward(a));
        assert_eq!(ids(&canvas), vec![b, a, c]);

        assert!(canvas.send_backward(c));
        assert_eq!(ids(&canvas), vec![b, c, a]);
        assert!(!canvas.send_backward(b));
    }

    #[test]
    fn test_topmost_hit_wins() {
        let mut canvas = Canvas::default();
        let _below = canvas.add(rect(0.0));
        let above = canvas.add(rect(5.0));
        assert_eq!(canvas.shape_at(Point::new(7.0, 5.0), 0.0), Some(above));
        assert_eq!(canvas.shape_at(Point::new(100.0, 100.0), 0.0), None);
    }

    #[test]
    fn test_content_bounds() {
        let mut canvas = Canvas::default();
        assert!(canvas.content_bounds().is_none());
        canvas.add(rect(0.0));
        canvas.add(rect(50.0));
        assert_eq!(canvas.content_bounds(), Some(Rect::new(0.0, 0.0, 60.0, 10.0)));
    }
}
