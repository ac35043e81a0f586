use serde::{Deserialize, Serialize};

use crate::geometry::{distance_to_segment, BoundingBox, Geometry, Point};

use super::polygon::HIT_TOLERANCE;

/// A segment described by its start, a length and a heading in degrees.
///
/// `end = start + length * (cos angle, sin angle)`. A negative length points
/// the other way.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ray {
    pub start: Point,
    pub length: f32,
    pub angle: f32,
}

impl Ray {
    pub fn new(start: Point, length: f32, angle: f32) -> Self {
        Self {
            start,
            length,
            angle,
        }
    }

    /// Ray from `start` through `end`
    pub fn between(start: Point, end: Point) -> Self {
        let mut ray = Self::new(start, 0.0, 0.0);
        ray.set_end(end);
        ray
    }

    pub fn end(&self) -> Point {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        Point::new(
            self.start.x + self.length * cos,
            self.start.y + self.length * sin,
        )
    }

    /// Recompute length and angle so the ray ends at `end`
    pub fn set_end(&mut self, end: Point) -> &mut Self {
        let d = end - self.start;
        self.length = d.length();
        if self.length > 0.0 {
            self.angle = d.y.atan2(d.x).to_degrees();
        }
        self
    }

    pub fn set_start(&mut self, start: Point) -> &mut Self {
        self.start = start;
        self
    }

    pub fn set_length(&mut self, length: f32) -> &mut Self {
        self.length = length;
        self
    }

    pub fn set_angle(&mut self, angle: f32) -> &mut Self {
        self.angle = angle;
        self
    }

    pub fn stretch(&mut self, factor: f32) -> &mut Self {
        self.length *= factor;
        self
    }

    pub fn spin(&mut self, degrees: f32) -> &mut Self {
        self.angle += degrees;
        self
    }

    /// Move the start to the current end; length and angle are kept, so
    /// repeated calls walk a chain of equal segments
    pub fn to_end(&mut self) -> &mut Self {
        self.start = self.end();
        self
    }

    fn map_endpoints(&mut self, f: impl Fn(&mut Point)) {
        let mut end = self.end();
        f(&mut self.start);
        f(&mut end);
        let sign = self.length.signum();
        self.set_end(end);
        // Keep a negative ray negative: flip the heading back
        if sign < 0.0 {
            self.length = -self.length;
            self.angle += 180.0;
        }
    }
}

impl Geometry for Ray {
    fn translate(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.start.translate(dx, dy);
        self
    }

    fn scale_xy(&mut self, fx: f32, fy: f32) -> &mut Self {
        self.map_endpoints(|p| {
            p.scale_xy(fx, fy);
        });
        self
    }

    fn scale_on_self_xy(&mut self, fx: f32, fy: f32) -> &mut Self {
        let pivot = self.center();
        self.map_endpoints(|p| {
            p.scale_about(fx, fy, pivot);
        });
        self
    }

    fn rotate_about(&mut self, angle: f32, pivot: Point) -> &mut Self {
        self.start.rotate(angle, pivot);
        self.angle += angle;
        self
    }

    fn contains(&self, point: Point) -> bool {
        distance_to_segment(point, self.start, self.end()) <= HIT_TOLERANCE
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&[self.start, self.end()])
    }

    fn center(&self) -> Point {
        self.bounding_box().center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn test_rotate_points_down() {
        let mut ray = Ray::new(Point::ORIGIN, 10.0, 0.0);
        ray.rotate(90.0);
        assert!(approx(ray.end(), Point::new(0.0, 10.0)));
    }

    #[test]
    fn test_to_end_walks_chain() {
        let mut ray = Ray::new(Point::new(1.0, 1.0), 5.0, 0.0);
        ray.to_end().to_end();
        assert!(approx(ray.start, Point::new(11.0, 1.0)));
        assert_eq!(ray.length, 5.0);
    }

    #[test]
    fn test_set_end_recomputes() {
        let mut ray = Ray::new(Point::ORIGIN, 1.0, 0.0);
        ray.set_end(Point::new(0.0, -4.0));
        assert!((ray.length - 4.0).abs() < 1e-5);
        assert!((ray.angle + 90.0).abs() < 1e-4);
        let between = Ray::between(Point::new(2.0, 2.0), Point::new(5.0, 6.0));
        assert!(approx(between.end(), Point::new(5.0, 6.0)));
    }

    #[test]
    fn test_negative_length_points_back() {
        let mut ray = Ray::new(Point::ORIGIN, -3.0, 0.0);
        assert!(approx(ray.end(), Point::new(-3.0, 0.0)));
        ray.scale(2.0);
        assert_eq!(ray.length.signum(), -1.0);
        assert!(approx(ray.end(), Point::new(-6.0, 0.0)));
    }

    #[test]
    fn test_stretch_and_spin() {
        let mut ray = Ray::new(Point::ORIGIN, 2.0, 0.0);
        ray.stretch(3.0).spin(180.0);
        assert!(approx(ray.end(), Point::new(-6.0, 0.0)));
        assert!(ray.contains(Point::new(-3.0, 0.2)));
        assert!(!ray.contains(Point::new(3.0, 0.0)));
    }
}
