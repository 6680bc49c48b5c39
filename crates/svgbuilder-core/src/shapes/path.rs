//! Path shape (freehand strokes and polylines).
//!
//! The command string is kept verbatim so imported paths survive a round trip.
//! Only the straight-line subset of the path grammar is interpreted:
//! `M`, `L`, `H`, `V` and `Z` in absolute and relative form. Curve and arc
//! commands still advance the current point, but their coordinates are not
//! collected and so do not contribute to bounds, hit testing or rendering.

use super::{GeometryTrait, ShapeStyle, envelope, point_to_polyline_dist};
use crate::markup::format_number;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A path described by a command string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathShape {
    /// Path command string (`d`).
    pub d: String,
}

/// A connected run of points produced by the path parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl PathShape {
    pub fn new(d: impl Into<String>) -> Self {
        Self { d: d.into() }
    }

    /// Start a path at a single point.
    pub fn starting_at(point: Point) -> Self {
        Self::new(format!("M {} {}", format_number(point.x), format_number(point.y)))
    }

    /// Build an open polyline through the given points.
    pub fn from_points(points: &[Point]) -> Self {
        let mut d = String::new();
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                d.push(' ');
            }
            d.push(if i == 0 { 'M' } else { 'L' });
            d.push_str(&format!(" {} {}", format_number(p.x), format_number(p.y)));
        }
        Self { d }
    }

    /// Append a line-to command.
    pub fn line_to(&mut self, point: Point) {
        if !self.d.is_empty() {
            self.d.push(' ');
        }
        self.d
            .push_str(&format!("L {} {}", format_number(point.x), format_number(point.y)));
    }

    /// Parsed subpaths.
    pub fn subpaths(&self) -> Vec<Subpath> {
        parse_path(&self.d)
    }

    /// All interpreted points in order.
    pub fn points(&self) -> Vec<Point> {
        self.subpaths().into_iter().flat_map(|s| s.points).collect()
    }

    /// The last interpreted point, if any.
    pub fn last_point(&self) -> Option<Point> {
        self.points().last().copied()
    }
}

impl GeometryTrait for PathShape {
    fn local_bounds(&self) -> Option<Rect> {
        envelope(self.points())
    }

    fn hit_test(&self, point: Point, tolerance: f64, style: &ShapeStyle) -> bool {
        let reach = tolerance + style.stroke_width / 2.0;
        self.subpaths().iter().any(|sub| {
            let mut pts = sub.points.clone();
            if sub.closed {
                if let Some(first) = pts.first().copied() {
                    pts.push(first);
                }
            }
            point_to_polyline_dist(point, &pts) <= reach
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Command(char),
    Number(f64),
}

fn tokenize(d: &str) -> Vec<Token> {
    let bytes = d.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_ascii_whitespace() || c == ',' {
            i += 1;
        } else if c.is_ascii_alphabetic() && c != 'e' && c != 'E' {
            tokens.push(Token::Command(c));
            i += 1;
        } else if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() {
            let start = i;
            i += 1;
            let mut seen_dot = c == '.';
            let mut seen_exp = false;
            while i < bytes.len() {
                let n = bytes[i] as char;
                if n.is_ascii_digit() {
                    i += 1;
                } else if n == '.' && !seen_dot && !seen_exp {
                    seen_dot = true;
                    i += 1;
                } else if (n == 'e' || n == 'E') && !seen_exp {
                    seen_exp = true;
                    i += 1;
                    if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+') {
                        i += 1;
                    }
                } else {
                    break;
                }
            }
            match d[start..i].parse::<f64>() {
                Ok(v) => tokens.push(Token::Number(v)),
                Err(_) => log::debug!("skipping malformed path number {:?}", &d[start..i]),
            }
        } else {
            // Anything else (including non-ASCII) is ignored.
            i += 1;
            while i < bytes.len() && !d.is_char_boundary(i) {
                i += 1;
            }
        }
    }

    tokens
}

fn arity(command: char) -> usize {
    match command.to_ascii_uppercase() {
        'M' | 'L' | 'T' => 2,
        'H' | 'V' => 1,
        'C' => 6,
        'S' | 'Q' => 4,
        'A' => 7,
        _ => 0,
    }
}

/// Parse the straight-line subset of a path command string.
pub fn parse_path(d: &str) -> Vec<Subpath> {
    let tokens = tokenize(d);
    let mut subpaths = Vec::new();
    let mut current: Option<Subpath> = None;
    let mut pos = Point::ZERO;
    let mut start = Point::ZERO;
    let mut command: Option<char> = None;
    let mut i = 0;

    let push_point = |current: &mut Option<Subpath>, from: Point, p: Point| {
        current
            .get_or_insert_with(|| Subpath {
                points: vec![from],
                closed: false,
            })
            .points
            .push(p);
    };

    while i < tokens.len() {
        if let Token::Command(c) = tokens[i] {
            i += 1;
            if c.eq_ignore_ascii_case(&'z') {
                if let Some(mut sub) = current.take() {
                    sub.closed = true;
                    subpaths.push(sub);
                }
                pos = start;
                command = None;
            } else if arity(c) == 0 {
                log::debug!("unknown path command {:?}", c);
                command = None;
            } else {
                command = Some(c);
            }
            continue;
        }

        let Some(cmd) = command else {
            // Stray number without a command.
            i += 1;
            continue;
        };
        let n = arity(cmd);
        let args: Vec<f64> = tokens[i..]
            .iter()
            .take(n)
            .map_while(|t| match t {
                Token::Number(v) => Some(*v),
                Token::Command(_) => None,
            })
            .collect();
        if args.len() < n {
            // Truncated command: ignore the remainder of this run.
            i += args.len();
            command = None;
            continue;
        }
        i += n;

        let relative = cmd.is_ascii_lowercase();
        let resolve = |x: f64, y: f64| {
            if relative {
                Point::new(pos.x + x, pos.y + y)
            } else {
                Point::new(x, y)
            }
        };

        match cmd.to_ascii_uppercase() {
            'M' => {
                let p = resolve(args[0], args[1]);
                if let Some(sub) = current.take() {
                    subpaths.push(sub);
                }
                current = Some(Subpath {
                    points: vec![p],
                    closed: false,
                });
                pos = p;
                start = p;
                // Further pairs after a moveto are implicit linetos.
                command = Some(if relative { 'l' } else { 'L' });
            }
            'L' => {
                let p = resolve(args[0], args[1]);
                push_point(&mut current, pos, p);
                pos = p;
            }
            'H' => {
                let x = if relative { pos.x + args[0] } else { args[0] };
                let p = Point::new(x, pos.y);
                push_point(&mut current, pos, p);
                pos = p;
            }
            'V' => {
                let y = if relative { pos.y + args[0] } else { args[0] };
                let p = Point::new(pos.x, y);
                push_point(&mut current, pos, p);
                pos = p;
            }
            _ => {
                // Curves and arcs: advance without collecting coordinates.
                pos = resolve(args[n - 2], args[n - 1]);
                if current.is_none() {
                    start = pos;
                }
            }
        }
    }

    if let Some(sub) = current {
        subpaths.push(sub);
    }
    subpaths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute_and_relative() {
        let subs = parse_path("M 10 10 L 20 10 l 0 10 H 5 v -5 Z");
        assert_eq!(subs.len(), 1);
        assert!(subs[0].closed);
        assert_eq!(
            subs[0].points,
            vec![
                Point::new(10.0, 10.0),
                Point::new(20.0, 10.0),
                Point::new(20.0, 20.0),
                Point::new(5.0, 20.0),
                Point::new(5.0, 15.0),
            ]
        );
    }

    #[test]
    fn test_parse_compact_numbers() {
        let subs = parse_path("M1-2L3.5.5");
        assert_eq!(subs[0].points, vec![Point::new(1.0, -2.0), Point::new(3.5, 0.5)]);
    }

    #[test]
    fn test_implicit_lineto_after_move() {
        let subs = parse_path("M 0 0 10 0 10 10");
        assert_eq!(subs[0].points.len(), 3);
    }

    #[test]
    fn test_curves_do_not_contribute() {
        let path = PathShape::new("M 0 0 C 100 100 200 200 50 0 L 60 0");
        let b = path.local_bounds().unwrap();
        assert_eq!(b, Rect::new(0.0, 0.0, 60.0, 0.0));
    }

    #[test]
    fn test_no_points_means_no_bounds() {
        assert_eq!(PathShape::new("").local_bounds(), None);
        assert_eq!(PathShape::new("Q 1 2 3 4").local_bounds(), None);
    }

    #[test]
    fn test_line_to_appends() {
        let mut path = PathShape::starting_at(Point::new(1.0, 2.0));
        path.line_to(Point::new(3.5, 4.0));
        assert_eq!(path.d, "M 1 2 L 3.5 4");
        assert_eq!(path.last_point(), Some(Point::new(3.5, 4.0)));
    }

    #[test]
    fn test_from_points() {
        let path = PathShape::from_points(&[Point::ZERO, Point::new(10.0, 0.0)]);
        assert_eq!(path.d, "M 0 0 L 10 0");
    }
}
