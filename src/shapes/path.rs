use serde::{Deserialize, Serialize};

use crate::geometry::{distance_to_segment, BoundingBox, Geometry, Point};

use super::polygon::{
    rotate_all, scale_all, translate_all, vertex_geometry, Points, Polygon, HIT_TOLERANCE,
};

/// Turtle-style vertex builder.
///
/// Starts at one point; `move_by` appends a point relative to the last one,
/// `move_to` appends an absolute point. The `Geometry` transforms act on
/// everything accumulated so far, so a path can be drawn in unit space and
/// then placed.
///
/// ```ignore
/// let star: Polygon = Path::start(0.0, -1.0)
///     .move_to(0.59, 0.81)
///     .move_to(-0.95, -0.31)
///     .scale(40.0)
///     .translate(50.0, 50.0)
///     .into();
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    points: Vec<Point>,
}

impl Path {
    pub fn start(x: f32, y: f32) -> Self {
        Self {
            points: vec![Point::new(x, y)],
        }
    }

    fn last(&self) -> Point {
        self.points.last().copied().unwrap_or_default()
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) -> &mut Self {
        let next = self.last() + Point::new(dx, dy);
        self.points.push(next);
        self
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.points.push(Point::new(x, y));
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn vertices(&self) -> &[Point] {
        &self.points
    }

    pub fn vertices_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }

    /// Snapshot of the accumulated points; the builder stays usable
    pub fn build(&self) -> Vec<Point> {
        self.points.clone()
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

vertex_geometry!(Path, |s, p| s
    .points
    .windows(2)
    .any(|seg| distance_to_segment(p, seg[0], seg[1]) <= HIT_TOLERANCE)
    || (s.points.len() == 1 && s.points[0].distance_to(p) <= HIT_TOLERANCE));

impl From<Point> for Path {
    fn from(start: Point) -> Self {
        Self::start(start.x, start.y)
    }
}

impl From<Path> for Vec<Point> {
    fn from(path: Path) -> Self {
        path.points
    }
}

impl From<&mut Path> for Vec<Point> {
    fn from(path: &mut Path) -> Self {
        path.build()
    }
}

impl From<Path> for Polygon {
    fn from(path: Path) -> Self {
        Polygon::from_vertices(path.points)
    }
}

impl From<&mut Path> for Polygon {
    fn from(path: &mut Path) -> Self {
        Polygon::from_vertices(path.build())
    }
}

impl From<Path> for Points {
    fn from(path: Path) -> Self {
        Points::new(path.points)
    }
}

impl From<&mut Path> for Points {
    fn from(path: &mut Path) -> Self {
        Points::new(path.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_by_is_relative() {
        let points = Path::start(1.0, 1.0)
            .move_by(2.0, 0.0)
            .move_by(0.0, 3.0)
            .move_to(0.0, 0.0)
            .build();
        assert_eq!(
            points,
            vec![
                Point::new(1.0, 1.0),
                Point::new(3.0, 1.0),
                Point::new(3.0, 4.0),
                Point::new(0.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_transforms_apply_to_all_points() {
        let poly: Polygon = Path::start(0.0, 0.0)
            .move_to(1.0, 0.0)
            .move_to(0.0, 1.0)
            .scale(10.0)
            .translate(5.0, 5.0)
            .into();
        assert_eq!(poly.vertices[1], Point::new(15.0, 5.0));
        assert_eq!(poly.vertices[2], Point::new(5.0, 15.0));
        assert!(poly.contains(Point::new(7.0, 7.0)));
    }

    #[test]
    fn test_open_path_hit_test() {
        let mut path = Path::start(0.0, 0.0);
        path.move_by(10.0, 0.0).move_by(0.0, 10.0);
        assert!(path.contains(Point::new(10.2, 5.0)));
        assert!(!path.contains(Point::new(5.0, 5.0)));
        assert_eq!(path.bounding_box(), BoundingBox::new(0.0, 0.0, 10.0, 10.0));
    }
}
