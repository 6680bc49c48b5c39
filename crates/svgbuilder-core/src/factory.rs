//! Shape creation and in-progress drawing updates.

use crate::shapes::{
    Circle, Ellipse, Geometry, Line, ParseKindError, PathShape, Rectangle, Shape, ShapeKind,
    ShapeStyle, StyleOverrides, Text,
};
use crate::snap::{LINE_ANGLE_INCREMENT, snap_line_endpoint};
use crate::tools::ToolKind;
use kurbo::Point;

/// Minimum distance between recorded freehand points.
pub const FREEHAND_MIN_DISTANCE: f64 = 5.0;

/// Builds new shapes with the editor's default style.
#[derive(Debug, Clone)]
pub struct ShapeFactory {
    /// Style every new shape starts from.
    pub style: ShapeStyle,
    /// Freehand points closer than this to the previous point are dropped.
    pub freehand_min_distance: f64,
}

impl Default for ShapeFactory {
    fn default() -> Self {
        Self {
            style: ShapeStyle::default(),
            freehand_min_distance: FREEHAND_MIN_DISTANCE,
        }
    }
}

impl ShapeFactory {
    pub fn new(style: ShapeStyle, freehand_min_distance: f64) -> Self {
        Self {
            style,
            freehand_min_distance,
        }
    }

    /// Create a zero-size shape of `kind` anchored at `start`.
    pub fn create(&self, kind: ShapeKind, start: Point, overrides: &StyleOverrides) -> Shape {
        let geometry = match kind {
            ShapeKind::Rectangle => Geometry::Rectangle(Rectangle::new(start, 0.0, 0.0)),
            ShapeKind::Circle => Geometry::Circle(Circle::new(start, 0.0)),
            ShapeKind::Ellipse => Geometry::Ellipse(Ellipse::new(start, 0.0, 0.0)),
            ShapeKind::Line => Geometry::Line(Line::new(start, start)),
            ShapeKind::Text => Geometry::Text(Text::new(start, "")),
            ShapeKind::Path => Geometry::Path(PathShape::starting_at(start)),
        };
        let mut shape = Shape::new(geometry).with_style(self.style.clone());
        overrides.apply(&mut shape);
        log::debug!("created {} {} at ({}, {})", kind, shape.id(), start.x, start.y);
        shape
    }

    /// Create the shape a tool draws, or `None` for tools that do not draw.
    pub fn create_for_tool(
        &self,
        tool: ToolKind,
        start: Point,
        overrides: &StyleOverrides,
    ) -> Option<Shape> {
        tool.shape_kind()
            .map(|kind| self.create(kind, start, overrides))
    }

    /// Create a shape from a kind name such as `"rect"` or `"ellipse"`.
    pub fn create_named(
        &self,
        kind: &str,
        start: Point,
        overrides: &StyleOverrides,
    ) -> Result<Shape, ParseKindError> {
        Ok(self.create(kind.parse()?, start, overrides))
    }

    /// Recompute in-progress geometry from the anchor and the live pointer.
    pub fn update_during_draw(&self, shape: &mut Shape, start: Point, current: Point, constrain: bool) {
        if let Some(rect) = shape.as_rectangle_mut() {
            if constrain {
                let side = (current.x - start.x).abs().max((current.y - start.y).abs());
                let x = if current.x < start.x { start.x - side } else { start.x };
                let y = if current.y < start.y { start.y - side } else { start.y };
                rect.position = Point::new(x, y);
                rect.width = side;
                rect.height = side;
            } else {
                let radii = (rect.corner_radius_x, rect.corner_radius_y);
                *rect = Rectangle::from_corners(start, current);
                (rect.corner_radius_x, rect.corner_radius_y) = radii;
            }
        } else if let Some(circle) = shape.as_circle_mut() {
            circle.center = start;
            circle.radius = start.distance(current);
        } else if let Some(ellipse) = shape.as_ellipse_mut() {
            let rx = (current.x - start.x).abs();
            let ry = (current.y - start.y).abs();
            let (rx, ry) = if constrain {
                let r = rx.max(ry);
                (r, r)
            } else {
                (rx, ry)
            };
            *ellipse = Ellipse::new(start, rx, ry);
        } else if let Some(line) = shape.as_line_mut() {
            line.start = start;
            line.end = if constrain {
                snap_line_endpoint(start, current, LINE_ANGLE_INCREMENT)
            } else {
                current
            };
        } else if let Some(path) = shape.as_path_mut() {
            let far_enough = path
                .last_point()
                .is_none_or(|last| last.distance(current) > self.freehand_min_distance);
            if far_enough {
                path.line_to(current);
            }
        }
    }
}

/// Clicks closer than this to the previous polyline click are repeats.
pub const REPEAT_CLICK_DISTANCE: f64 = 0.5;

/// Direction a polyline segment is forced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Orientation of the next segment after `confirmed` corner points.
///
/// Odd counts continue horizontally, even counts vertically, so segments
/// alternate starting with a horizontal run from the first point.
pub fn polyline_orientation(confirmed: usize) -> Orientation {
    if confirmed % 2 == 1 {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    }
}

/// Multi-click path whose segments alternate horizontal and vertical.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolylineBuilder {
    points: Vec<Point>,
    /// Unconstrained position of the latest click.
    last_click: Point,
}

impl PolylineBuilder {
    pub fn new(start: Point) -> Self {
        Self {
            points: vec![start],
            last_click: start,
        }
    }

    /// Confirmed corner points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Project `point` onto the line the next segment is forced along.
    pub fn constrain(&self, point: Point) -> Point {
        let Some(last) = self.points.last() else {
            return point;
        };
        match polyline_orientation(self.points.len()) {
            Orientation::Horizontal => Point::new(point.x, last.y),
            Orientation::Vertical => Point::new(last.x, point.y),
        }
    }

    /// Confirm the next corner and return it, constrained.
    ///
    /// A click within [`REPEAT_CLICK_DISTANCE`] of the previous one (the second
    /// press of a double-click) adds nothing and returns `None`.
    pub fn push(&mut self, point: Point) -> Option<Point> {
        if point.distance(self.last_click) <= REPEAT_CLICK_DISTANCE {
            return None;
        }
        self.last_click = point;
        let corner = self.constrain(point);
        self.points.push(corner);
        Some(corner)
    }

    /// Path through the confirmed points plus a live preview segment.
    pub fn preview(&self, live: Point) -> PathShape {
        let mut points = self.points.clone();
        points.push(self.constrain(live));
        PathShape::from_points(&points)
    }

    /// Path through the confirmed points only, or `None` if no segment exists.
    /// Zero-length segments are dropped.
    pub fn finish(&self) -> Option<PathShape> {
        let mut points = self.points.clone();
        points.dedup();
        (points.len() >= 2).then(|| PathShape::from_points(&points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::compute_bounds;

    fn factory() -> ShapeFactory {
        ShapeFactory::default()
    }

    #[test]
    fn test_fresh_shapes_have_zero_size() {
        let start = Point::new(30.0, 40.0);
        for kind in ShapeKind::all() {
            let shape = factory().create(*kind, start, &StyleOverrides::default());
            assert_eq!(shape.kind(), *kind);
            let b = compute_bounds(&shape, true).unwrap();
            assert_eq!((b.x, b.y, b.width, b.height), (30.0, 40.0, 0.0, 0.0), "{}", kind);
        }
    }

    #[test]
    fn test_overrides_merge_with_defaults() {
        let overrides = StyleOverrides {
            stroke: Some("#00ff00".into()),
            ..Default::default()
        };
        let shape = factory().create(ShapeKind::Circle, Point::ZERO, &overrides);
        assert_eq!(shape.style.stroke, "#00ff00");
        assert_eq!(shape.style.fill, ShapeStyle::default().fill);
    }

    #[test]
    fn test_tools_without_kind_create_nothing() {
        let overrides = StyleOverrides::default();
        assert!(factory().create_for_tool(ToolKind::Select, Point::ZERO, &overrides).is_none());
        assert!(factory().create_for_tool(ToolKind::Pan, Point::ZERO, &overrides).is_none());
        assert!(factory().create_for_tool(ToolKind::Polyline, Point::ZERO, &overrides).is_some());
    }

    #[test]
    fn test_unknown_kind_name() {
        let err = factory()
            .create_named("hexagon", Point::ZERO, &StyleOverrides::default())
            .unwrap_err();
        assert_eq!(err, ParseKindError("hexagon".into()));
        assert!(factory().create_named("rect", Point::ZERO, &StyleOverrides::default()).is_ok());
    }

    #[test]
    fn test_constrained_rectangle() {
        let start = Point::new(10.0, 10.0);
        let mut shape = factory().create(ShapeKind::Rectangle, start, &StyleOverrides::default());
        factory().update_during_draw(&mut shape, start, Point::new(50.0, 30.0), true);
        let rect = shape.as_rectangle().unwrap();
        assert_eq!((rect.width, rect.height), (40.0, 40.0));
        assert_eq!(rect.position, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_constrained_rectangle_up_left() {
        let start = Point::new(100.0, 100.0);
        let mut shape = factory().create(ShapeKind::Rectangle, start, &StyleOverrides::default());
        factory().update_during_draw(&mut shape, start, Point::new(70.0, 90.0), true);
        let rect = shape.as_rectangle().unwrap();
        assert_eq!(rect.position, Point::new(70.0, 70.0));
        assert_eq!(rect.as_rect().x1, 100.0);
        assert_eq!(rect.as_rect().y1, 100.0);
    }

    #[test]
    fn test_unconstrained_rectangle_min_max() {
        let start = Point::new(50.0, 50.0);
        let mut shape = factory().create(ShapeKind::Rectangle, start, &StyleOverrides::default());
        factory().update_during_draw(&mut shape, start, Point::new(20.0, 80.0), false);
        let rect = shape.as_rectangle().unwrap();
        assert_eq!(rect.position, Point::new(20.0, 50.0));
        assert_eq!((rect.width, rect.height), (30.0, 30.0));
    }

    #[test]
    fn test_circle_and_ellipse_draw() {
        let start = Point::ZERO;
        let mut circle = factory().create(ShapeKind::Circle, start, &StyleOverrides::default());
        factory().update_during_draw(&mut circle, start, Point::new(3.0, 4.0), false);
        assert!((circle.as_circle().unwrap().radius - 5.0).abs() < 1e-9);

        let mut ellipse = factory().create(ShapeKind::Ellipse, start, &StyleOverrides::default());
        factory().update_during_draw(&mut ellipse, start, Point::new(-30.0, 10.0), false);
        let e = ellipse.as_ellipse().unwrap();
        assert_eq!((e.radius_x, e.radius_y), (30.0, 10.0));
        factory().update_during_draw(&mut ellipse, start, Point::new(-30.0, 10.0), true);
        let e = ellipse.as_ellipse().unwrap();
        assert_eq!((e.radius_x, e.radius_y), (30.0, 30.0));
    }

    #[test]
    fn test_constrained_line_snaps_to_45() {
        let start = Point::ZERO;
        let mut line = factory().create(ShapeKind::Line, start, &StyleOverrides::default());
        factory().update_during_draw(&mut line, start, Point::new(100.0, 10.0), true);
        let l = line.as_line().unwrap();
        assert!(l.end.y.abs() < 1e-9);
        assert!((l.end.x - 100f64.hypot(10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_freehand_throttles_points() {
        let start = Point::ZERO;
        let mut path = factory().create(ShapeKind::Path, start, &StyleOverrides::default());
        factory().update_during_draw(&mut path, start, Point::new(3.0, 0.0), false);
        assert_eq!(path.as_path().unwrap().points().len(), 1);
        factory().update_during_draw(&mut path, start, Point::new(6.0, 0.0), false);
        factory().update_during_draw(&mut path, start, Point::new(8.0, 0.0), false);
        assert_eq!(path.as_path().unwrap().points().len(), 2);
        factory().update_during_draw(&mut path, start, Point::new(20.0, 0.0), false);
        assert_eq!(path.as_path().unwrap().d, "M 0 0 L 6 0 L 20 0");
    }

    #[test]
    fn test_polyline_parity() {
        for confirmed in 1..=6usize {
            let expected = if confirmed % 2 == 1 {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            assert_eq!(polyline_orientation(confirmed), expected, "L = {}", confirmed);

            let mut builder = PolylineBuilder::new(Point::ZERO);
            for i in 1..confirmed {
                builder.push(Point::new(i as f64 * 10.0, i as f64 * 7.0));
            }
            assert_eq!(builder.points().len(), confirmed);
            let last = *builder.points().last().unwrap();
            let preview = builder.constrain(Point::new(last.x + 33.0, last.y + 44.0));
            match expected {
                Orientation::Horizontal => assert_eq!(preview.y, last.y),
                Orientation::Vertical => assert_eq!(preview.x, last.x),
            }
        }
    }

    #[test]
    fn test_polyline_segments_alternate() {
        let mut builder = PolylineBuilder::new(Point::new(0.0, 0.0));
        builder.push(Point::new(50.0, 5.0));
        builder.push(Point::new(45.0, 40.0));
        builder.push(Point::new(90.0, 41.0));
        assert_eq!(
            builder.points(),
            &[
                Point::new(0.0, 0.0),
                Point::new(50.0, 0.0),
                Point::new(50.0, 40.0),
                Point::new(90.0, 40.0),
            ]
        );
    }

    #[test]
    fn test_polyline_repeat_click_adds_no_corner() {
        let mut builder = PolylineBuilder::new(Point::ZERO);
        assert_eq!(builder.push(Point::ZERO), None);
        assert_eq!(builder.push(Point::new(50.0, 30.0)), Some(Point::new(50.0, 0.0)));
        assert_eq!(builder.push(Point::new(90.0, 60.0)), Some(Point::new(50.0, 60.0)));
        assert_eq!(builder.push(Point::new(90.2, 60.0)), None);
        assert_eq!(builder.finish().unwrap().d, "M 0 0 L 50 0 L 50 60");
    }

    #[test]
    fn test_polyline_finish_emits_confirmed_only() {
        let mut builder = PolylineBuilder::new(Point::ZERO);
        assert!(builder.finish().is_none());
        builder.push(Point::new(10.0, 3.0));
        assert_eq!(builder.preview(Point::new(12.0, 20.0)).d, "M 0 0 L 10 0 L 10 20");
        assert_eq!(builder.finish().unwrap().d, "M 0 0 L 10 0");
    }
}
