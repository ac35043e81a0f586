//! Geometry kernel: points, boxes, the uniform transform capability set
//!
//! Angles are in degrees. Screen coordinates are Y-down, so a positive angle
//! turns +x towards +y, which reads as clockwise on screen.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A point (or vector) in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        length(self.x - other.x, self.y - other.y)
    }

    pub fn translate(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.x += dx;
        self.y += dy;
        self
    }

    /// Scale about the world origin
    pub fn scale(&mut self, factor: f32) -> &mut Self {
        self.scale_xy(factor, factor)
    }

    pub fn scale_xy(&mut self, fx: f32, fy: f32) -> &mut Self {
        self.x *= fx;
        self.y *= fy;
        self
    }

    /// Scale about `pivot`
    pub fn scale_about(&mut self, fx: f32, fy: f32, pivot: Point) -> &mut Self {
        self.x = pivot.x + (self.x - pivot.x) * fx;
        self.y = pivot.y + (self.y - pivot.y) * fy;
        self
    }

    /// Rotate about `pivot` by `angle` degrees
    pub fn rotate(&mut self, angle: f32, pivot: Point) -> &mut Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        self.x = pivot.x + dx * cos - dy * sin;
        self.y = pivot.y + dx * sin + dy * cos;
        self
    }

    /// Rotated copy
    pub fn rotated(mut self, angle: f32, pivot: Point) -> Self {
        self.rotate(angle, pivot);
        self
    }

    #[inline]
    pub fn dot(self, other: Point) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn length(self) -> f32 {
        length(self.x, self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl Add<f32> for Point {
    type Output = Point;
    fn add(self, rhs: f32) -> Point {
        Point::new(self.x + rhs, self.y + rhs)
    }
}

impl Sub<f32> for Point {
    type Output = Point;
    fn sub(self, rhs: f32) -> Point {
        Point::new(self.x - rhs, self.y - rhs)
    }
}

impl Mul<f32> for Point {
    type Output = Point;
    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Point> for f32 {
    type Output = Point;
    fn mul(self, rhs: Point) -> Point {
        rhs * self
    }
}

impl Div<f32> for Point {
    type Output = Point;
    fn div(self, rhs: f32) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl AddAssign<f32> for Point {
    fn add_assign(&mut self, rhs: f32) {
        self.x += rhs;
        self.y += rhs;
    }
}

impl SubAssign<f32> for Point {
    fn sub_assign(&mut self, rhs: f32) {
        self.x -= rhs;
        self.y -= rhs;
    }
}

impl MulAssign<f32> for Point {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl DivAssign<f32> for Point {
    fn div_assign(&mut self, rhs: f32) {
        self.x /= rhs;
        self.y /= rhs;
    }
}

// ============================================================================
// BoundingBox
// ============================================================================

/// Axis-aligned box, recomputed from a shape on demand
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest box containing every point; zero box for an empty slice
    pub fn from_points(points: &[Point]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Self::from_extents(min_x, min_y, max_x, max_y)
    }

    pub fn from_extents(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive on all edges
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.left() && px <= self.right() && py >= self.top() && py <= self.bottom()
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.contains(p.x, p.y)
    }

    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        Self::from_extents(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Grow by `margin` on every side
    pub fn inflate(&self, margin: f32) -> BoundingBox {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }
}

// ============================================================================
// PixelRect
// ============================================================================

/// Integer pixel rectangle, right/bottom exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge, clamped to `i32::MAX`
    pub fn right(&self) -> i32 {
        clamp_edge(self.x as i64 + self.width as i64)
    }

    /// Exclusive bottom edge, clamped to `i32::MAX`
    pub fn bottom(&self) -> i32 {
        clamp_edge(self.y as i64 + self.height as i64)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Overlap of two rects, `None` when they don't touch
    pub fn intersect(&self, other: &PixelRect) -> Option<PixelRect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Self::new(
            left,
            top,
            (right as i64 - left as i64) as u32,
            (bottom as i64 - top as i64) as u32,
        ))
    }
}

fn clamp_edge(edge: i64) -> i32 {
    edge.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

// ============================================================================
// Uniform transform / query capability set
// ============================================================================

/// The capability set every shape exposes.
///
/// Plain `scale`/`rotate` pivot on the world origin (for transforming groups
/// of shapes together); the `_on_self` variants pivot on the shape's own
/// center (for resizing or spinning a shape in place).
pub trait Geometry {
    fn translate(&mut self, dx: f32, dy: f32) -> &mut Self;

    /// Scale relative to the world origin
    fn scale_xy(&mut self, fx: f32, fy: f32) -> &mut Self;

    /// Scale relative to the shape's own center
    fn scale_on_self_xy(&mut self, fx: f32, fy: f32) -> &mut Self;

    /// Rotate by `angle` degrees about `pivot`
    fn rotate_about(&mut self, angle: f32, pivot: Point) -> &mut Self;

    fn contains(&self, point: Point) -> bool;

    fn bounding_box(&self) -> BoundingBox;

    fn center(&self) -> Point;

    fn translate_by(&mut self, delta: Point) -> &mut Self {
        self.translate(delta.x, delta.y)
    }

    fn scale(&mut self, factor: f32) -> &mut Self {
        self.scale_xy(factor, factor)
    }

    fn scale_on_self(&mut self, factor: f32) -> &mut Self {
        self.scale_on_self_xy(factor, factor)
    }

    /// Rotate about the world origin
    fn rotate(&mut self, angle: f32) -> &mut Self {
        self.rotate_about(angle, Point::ORIGIN)
    }

    /// Rotate about the shape's own center
    fn rotate_on_self(&mut self, angle: f32) -> &mut Self {
        let pivot = self.center();
        self.rotate_about(angle, pivot)
    }
}

// ============================================================================
// Free helpers
// ============================================================================

/// Even-odd point-in-polygon test using ray casting
pub fn point_in_polygon(px: f32, py: f32, vertices: &[Point]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let vi = vertices[i];
        let vj = vertices[j];

        // Skip horizontal edges (avoid division by zero)
        let dy = vj.y - vi.y;
        if dy.abs() > f32::EPSILON && ((vi.y > py) != (vj.y > py)) {
            let x_intersect = (vj.x - vi.x) * (py - vi.y) / dy + vi.x;
            if px < x_intersect {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

/// Calculate the length of a 2D vector
#[inline]
pub fn length(x: f32, y: f32) -> f32 {
    (x * x + y * y).sqrt()
}

/// Distance from `p` to the segment `a`-`b`
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    if len_sq < 1e-12 {
        return p.distance_to(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance_to(a + ab * t)
}

/// Normalize an angle in degrees to `[0, 360)`
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn test_point_arithmetic() {
        let mut p = Point::new(1.0, 2.0) + Point::new(3.0, 4.0);
        assert_eq!(p, Point::new(4.0, 6.0));
        p *= 0.5;
        assert_eq!(p, Point::new(2.0, 3.0));
        assert_eq!(-p, Point::new(-2.0, -3.0));
        assert_eq!(2.0 * p - 1.0, Point::new(3.0, 5.0));
        assert_eq!(p / 2.0, Point::new(1.0, 1.5));
    }

    #[test]
    fn test_rotate_is_clockwise_on_screen() {
        let mut p = Point::new(10.0, 0.0);
        p.rotate(90.0, Point::ORIGIN);
        assert!(approx(p, Point::new(0.0, 10.0)));
        let q = Point::new(6.0, 5.0).rotated(180.0, Point::new(5.0, 5.0));
        assert!(approx(q, Point::new(4.0, 5.0)));
    }

    #[test]
    fn test_bounding_box_from_points() {
        let bb = BoundingBox::from_points(&[
            Point::new(3.0, -1.0),
            Point::new(-2.0, 4.0),
            Point::new(1.0, 1.0),
        ]);
        assert_eq!(bb, BoundingBox::new(-2.0, -1.0, 5.0, 5.0));
        assert_eq!(bb.center(), Point::new(0.5, 1.5));
        assert!(bb.contains(3.0, 4.0));
        assert!(!bb.contains(3.1, 4.0));
        assert!(bb.inflate(1.0).contains_box(&bb));
        assert!(!bb.contains_box(&bb.inflate(0.5)));
        assert_eq!(BoundingBox::from_points(&[]), BoundingBox::default());
    }

    #[test]
    fn test_pixel_rect_intersect() {
        let a = PixelRect::new(0, 0, 10, 10);
        let b = PixelRect::new(-5, 8, 8, 8);
        assert_eq!(a.intersect(&b), Some(PixelRect::new(0, 8, 3, 2)));
        assert_eq!(a.intersect(&PixelRect::new(10, 0, 5, 5)), None);
        assert_eq!(a.intersect(&PixelRect::new(2, 2, 0, 5)), None);
    }

    #[test]
    fn test_pixel_rect_huge_extent() {
        let huge = PixelRect::new(0, 0, u32::MAX, u32::MAX);
        assert_eq!(huge.right(), i32::MAX);
        assert_eq!(huge.bottom(), i32::MAX);
        let small = PixelRect::new(0, 0, 8, 8);
        assert_eq!(huge.intersect(&small), Some(small));
        let wide = PixelRect::new(i32::MIN, 0, u32::MAX, 1);
        assert_eq!(wide.right(), i32::MAX);
        assert_eq!(wide.intersect(&small), Some(PixelRect::new(0, 0, 8, 1)));
    }

    #[test]
    fn test_point_in_polygon_even_odd() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(5.0, 5.0, &square));
        assert!(!point_in_polygon(15.0, 5.0, &square));
        assert!(!point_in_polygon(5.0, 5.0, &square[..2]));
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert_eq!(distance_to_segment(Point::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_segment(Point::new(13.0, 4.0), a, b), 5.0);
        assert_eq!(distance_to_segment(Point::new(0.0, 2.0), a, a), 2.0);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-10.0), 350.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
    }
}
