//! Vertex-list shapes: point sets, lines, polygons, triangles

use serde::{Deserialize, Serialize};

use crate::geometry::{distance_to_segment, point_in_polygon, BoundingBox, Geometry, Point};

/// Hit radius for shapes without area (points, lines, rays)
pub(crate) const HIT_TOLERANCE: f32 = 0.5;

pub(crate) fn translate_all(points: &mut [Point], dx: f32, dy: f32) {
    for p in points {
        p.translate(dx, dy);
    }
}

pub(crate) fn scale_all(points: &mut [Point], fx: f32, fy: f32, pivot: Point) {
    for p in points {
        p.scale_about(fx, fy, pivot);
    }
}

pub(crate) fn rotate_all(points: &mut [Point], angle: f32, pivot: Point) {
    let (sin, cos) = angle.to_radians().sin_cos();
    for p in points {
        let dx = p.x - pivot.x;
        let dy = p.y - pivot.y;
        p.x = pivot.x + dx * cos - dy * sin;
        p.y = pivot.y + dx * sin + dy * cos;
    }
}

/// Implements `Geometry` for a shape whose only state is a vertex list
macro_rules! vertex_geometry {
    ($ty:ty, |$s:ident, $p:ident| $contains:expr) => {
        impl Geometry for $ty {
            fn translate(&mut self, dx: f32, dy: f32) -> &mut Self {
                translate_all(self.vertices_mut(), dx, dy);
                self
            }

            fn scale_xy(&mut self, fx: f32, fy: f32) -> &mut Self {
                scale_all(self.vertices_mut(), fx, fy, Point::ORIGIN);
                self
            }

            fn scale_on_self_xy(&mut self, fx: f32, fy: f32) -> &mut Self {
                let pivot = self.center();
                scale_all(self.vertices_mut(), fx, fy, pivot);
                self
            }

            fn rotate_about(&mut self, angle: f32, pivot: Point) -> &mut Self {
                rotate_all(self.vertices_mut(), angle, pivot);
                self
            }

            fn contains(&self, point: Point) -> bool {
                let $s = self;
                let $p = point;
                $contains
            }

            fn bounding_box(&self) -> BoundingBox {
                BoundingBox::from_points(self.vertices())
            }

            fn center(&self) -> Point {
                self.bounding_box().center()
            }
        }
    };
}

pub(crate) use vertex_geometry;

// ============================================================================
// Points
// ============================================================================

/// An open list of vertices, drawn as dots
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Points {
    pub points: Vec<Point>,
}

impl Points {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, x: f32, y: f32) -> &mut Self {
        self.points.push(Point::new(x, y));
        self
    }

    pub fn vertices(&self) -> &[Point] {
        &self.points
    }

    pub fn vertices_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }
}

vertex_geometry!(Points, |s, p| s
    .points
    .iter()
    .any(|v| v.distance_to(p) <= HIT_TOLERANCE));

impl From<Vec<Point>> for Points {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

// ============================================================================
// Line
// ============================================================================

/// A segment between two endpoints
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Line {
    points: [Point; 2],
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            points: [start, end],
        }
    }

    pub fn from_coords(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(Point::new(x0, y0), Point::new(x1, y1))
    }

    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn end(&self) -> Point {
        self.points[1]
    }

    pub fn set_start(&mut self, start: Point) -> &mut Self {
        self.points[0] = start;
        self
    }

    pub fn set_end(&mut self, end: Point) -> &mut Self {
        self.points[1] = end;
        self
    }

    pub fn length(&self) -> f32 {
        self.start().distance_to(self.end())
    }

    pub fn vertices(&self) -> &[Point] {
        &self.points
    }

    pub fn vertices_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }
}

vertex_geometry!(Line, |s, p| distance_to_segment(p, s.start(), s.end())
    <= HIT_TOLERANCE);

// ============================================================================
// Polygon
// ============================================================================

/// A closed vertex loop, filled with the even-odd rule
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
        }
    }

    pub fn from_vertices(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    pub fn add_vertex(&mut self, x: f32, y: f32) -> &mut Self {
        self.vertices.push(Point::new(x, y));
        self
    }

    /// Enough vertices to enclose an area
    pub fn is_closed(&self) -> bool {
        self.vertices.len() >= 3
    }

    /// Get edges as line segments, including the closing edge
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Vertex average; `None` if the polygon is empty
    pub fn centroid(&self) -> Option<Point> {
        if self.vertices.is_empty() {
            return None;
        }
        let sum = self
            .vertices
            .iter()
            .fold(Point::ORIGIN, |acc, &v| acc + v);
        Some(sum / self.vertices.len() as f32)
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [Point] {
        &mut self.vertices
    }
}

vertex_geometry!(Polygon, |s, p| point_in_polygon(p.x, p.y, &s.vertices));

impl From<Vec<Point>> for Polygon {
    fn from(vertices: Vec<Point>) -> Self {
        Self::from_vertices(vertices)
    }
}

// ============================================================================
// Triangle
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Triangle {
    points: [Point; 3],
}

impl Triangle {
    pub fn new(a: Point, b: Point, c: Point) -> Self {
        Self { points: [a, b, c] }
    }

    pub fn from_coords(ax: f32, ay: f32, bx: f32, by: f32, cx: f32, cy: f32) -> Self {
        Self::new(Point::new(ax, ay), Point::new(bx, by), Point::new(cx, cy))
    }

    pub fn vertices(&self) -> &[Point] {
        &self.points
    }

    pub fn vertices_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }
}

vertex_geometry!(Triangle, |s, p| point_in_polygon(p.x, p.y, &s.points));

impl std::ops::Index<usize> for Triangle {
    type Output = Point;
    fn index(&self, index: usize) -> &Point {
        &self.points[index]
    }
}

impl std::ops::IndexMut<usize> for Triangle {
    fn index_mut(&mut self, index: usize) -> &mut Point {
        &mut self.points[index]
    }
}
