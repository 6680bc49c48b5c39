//! Handle definitions for shape manipulation.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A manipulation handle on the selected shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// The kind of handle (determines behavior).
    pub kind: HandleKind,
    /// Position in canvas coordinates.
    pub position: Point,
    /// Visual shape of the handle.
    pub shape: HandleShape,
}

/// The kind of handle - determines what manipulation it performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    // Perimeter handles, named by compass direction
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    // Endpoint handles (for lines)
    Start,
    End,
    // Rotation handle
    Rotate,
}

/// Visual shape of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleShape {
    /// Square handle (default for perimeter handles).
    #[default]
    Square,
    /// Circular handle (line endpoints and rotation).
    Circle,
}

impl Handle {
    /// Create a new handle.
    pub fn new(kind: HandleKind, position: Point) -> Self {
        Self {
            kind,
            position,
            shape: HandleShape::default(),
        }
    }

    /// Set the handle shape.
    pub fn with_shape(mut self, shape: HandleShape) -> Self {
        self.shape = shape;
        self
    }

    /// Check if a canvas point is within `tolerance` of this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.position.distance(point) <= tolerance
    }
}

impl HandleKind {
    /// The eight perimeter handles, clockwise from north-west.
    pub const PERIMETER: [HandleKind; 8] = [
        HandleKind::NorthWest,
        HandleKind::North,
        HandleKind::NorthEast,
        HandleKind::East,
        HandleKind::SouthEast,
        HandleKind::South,
        HandleKind::SouthWest,
        HandleKind::West,
    ];

    /// Short compass name ("nw", "n", ...); used as a cursor hint by hosts.
    pub fn name(&self) -> &'static str {
        match self {
            HandleKind::NorthWest => "nw",
            HandleKind::North => "n",
            HandleKind::NorthEast => "ne",
            HandleKind::East => "e",
            HandleKind::SouthEast => "se",
            HandleKind::South => "s",
            HandleKind::SouthWest => "sw",
            HandleKind::West => "w",
            HandleKind::Start => "start",
            HandleKind::End => "end",
            HandleKind::Rotate => "rotate",
        }
    }

    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            HandleKind::NorthWest | HandleKind::NorthEast | HandleKind::SouthEast | HandleKind::SouthWest
        )
    }

    /// Whether dragging this handle moves the west (left) edge.
    pub fn moves_west(&self) -> bool {
        matches!(self, HandleKind::NorthWest | HandleKind::West | HandleKind::SouthWest)
    }

    /// Whether dragging this handle moves the east (right) edge.
    pub fn moves_east(&self) -> bool {
        matches!(self, HandleKind::NorthEast | HandleKind::East | HandleKind::SouthEast)
    }

    /// Whether dragging this handle moves the north (top) edge.
    pub fn moves_north(&self) -> bool {
        matches!(self, HandleKind::NorthWest | HandleKind::North | HandleKind::NorthEast)
    }

    /// Whether dragging this handle moves the south (bottom) edge.
    pub fn moves_south(&self) -> bool {
        matches!(self, HandleKind::SouthWest | HandleKind::South | HandleKind::SouthEast)
    }

    /// Relative position on a unit box, (0,0) = north-west, (1,1) = south-east.
    /// `None` for handles that do not sit on the perimeter.
    pub fn unit_position(&self) -> Option<(f64, f64)> {
        Some(match self {
            HandleKind::NorthWest => (0.0, 0.0),
            HandleKind::North => (0.5, 0.0),
            HandleKind::NorthEast => (1.0, 0.0),
            HandleKind::East => (1.0, 0.5),
            HandleKind::SouthEast => (1.0, 1.0),
            HandleKind::South => (0.5, 1.0),
            HandleKind::SouthWest => (0.0, 1.0),
            HandleKind::West => (0.0, 0.5),
            HandleKind::Start | HandleKind::End | HandleKind::Rotate => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_hit_test() {
        let handle = Handle::new(HandleKind::Start, Point::new(50.0, 50.0));
        assert!(handle.hit_test(Point::new(50.0, 50.0), 10.0));
        assert!(handle.hit_test(Point::new(55.0, 55.0), 10.0));
        assert!(!handle.hit_test(Point::new(70.0, 70.0), 10.0));
    }

    #[test]
    fn test_directions_are_exclusive() {
        for kind in HandleKind::PERIMETER {
            assert!(!(kind.moves_west() && kind.moves_east()));
            assert!(!(kind.moves_north() && kind.moves_south()));
            assert_eq!(kind.is_corner(), (kind.moves_west() || kind.moves_east()) && (kind.moves_north() || kind.moves_south()));
        }
    }
}
