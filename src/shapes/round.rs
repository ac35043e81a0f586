//! Analytic shapes: circles, ellipses, sectors

use serde::{Deserialize, Serialize};

use crate::geometry::{normalize_degrees, BoundingBox, Geometry, Point};

/// Circles stay circles under non-uniform scale: radius takes the geometric mean
#[inline]
fn radius_scale(fx: f32, fy: f32) -> f32 {
    (fx * fy).abs().sqrt()
}

// ============================================================================
// Circle
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
}

impl Circle {
    pub fn new(center_x: f32, center_y: f32, radius: f32) -> Self {
        Self {
            center: Point::new(center_x, center_y),
            radius,
        }
    }

    pub fn at(center: Point, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn set_radius(&mut self, radius: f32) -> &mut Self {
        self.radius = radius;
        self
    }
}

impl From<Circle> for Point {
    fn from(circle: Circle) -> Point {
        circle.center
    }
}

impl Geometry for Circle {
    fn translate(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.center.translate(dx, dy);
        self
    }

    fn scale_xy(&mut self, fx: f32, fy: f32) -> &mut Self {
        self.center.scale_xy(fx, fy);
        self.radius *= radius_scale(fx, fy);
        self
    }

    fn scale_on_self_xy(&mut self, fx: f32, fy: f32) -> &mut Self {
        self.radius *= radius_scale(fx, fy);
        self
    }

    fn rotate_about(&mut self, angle: f32, pivot: Point) -> &mut Self {
        self.center.rotate(angle, pivot);
        self
    }

    fn contains(&self, point: Point) -> bool {
        self.radius > 0.0 && point.distance_to(self.center) <= self.radius
    }

    fn bounding_box(&self) -> BoundingBox {
        let r = self.radius.abs();
        BoundingBox::new(self.center.x - r, self.center.y - r, 2.0 * r, 2.0 * r)
    }

    fn center(&self) -> Point {
        self.center
    }
}

// ============================================================================
// Ellipse
// ============================================================================

/// Ellipse given by center, full width/height and rotation (degrees)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: Point,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub rotation: f32,
}

impl Ellipse {
    pub fn new(center_x: f32, center_y: f32, width: f32, height: f32, rotation: f32) -> Self {
        Self {
            center: Point::new(center_x, center_y),
            width,
            height,
            rotation,
        }
    }

    /// Semi-axes (a, b), always non-negative
    pub fn semi_axes(&self) -> (f32, f32) {
        (self.width.abs() / 2.0, self.height.abs() / 2.0)
    }

    /// Map a world point into the unrotated frame centered on the ellipse
    pub fn to_local(&self, point: Point) -> Point {
        let d = point - self.center;
        if self.rotation == 0.0 {
            return d;
        }
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        Point::new(d.x * cos + d.y * sin, -d.x * sin + d.y * cos)
    }
}

impl From<Ellipse> for Point {
    fn from(ellipse: Ellipse) -> Point {
        ellipse.center
    }
}

impl Geometry for Ellipse {
    fn translate(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.center.translate(dx, dy);
        self
    }

    /// Axes scale in the ellipse's local frame
    fn scale_xy(&mut self, fx: f32, fy: f32) -> &mut Self {
        self.center.scale_xy(fx, fy);
        self.width *= fx.abs();
        self.height *= fy.abs();
        self
    }

    fn scale_on_self_xy(&mut self, fx: f32, fy: f32) -> &mut Self {
        self.width *= fx.abs();
        self.height *= fy.abs();
        self
    }

    fn rotate_about(&mut self, angle: f32, pivot: Point) -> &mut Self {
        self.center.rotate(angle, pivot);
        self.rotation += angle;
        self
    }

    fn contains(&self, point: Point) -> bool {
        let (a, b) = self.semi_axes();
        if a <= 0.0 || b <= 0.0 {
            return false;
        }
        let local = self.to_local(point);
        (local.x / a).powi(2) + (local.y / b).powi(2) <= 1.0
    }

    fn bounding_box(&self) -> BoundingBox {
        let (a, b) = self.semi_axes();
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let half_w = ((a * cos).powi(2) + (b * sin).powi(2)).sqrt();
        let half_h = ((a * sin).powi(2) + (b * cos).powi(2)).sqrt();
        BoundingBox::new(
            self.center.x - half_w,
            self.center.y - half_h,
            2.0 * half_w,
            2.0 * half_h,
        )
    }

    fn center(&self) -> Point {
        self.center
    }
}

// ============================================================================
// Sector
// ============================================================================

/// Pie slice: center, radius and an angular range in degrees.
///
/// Angles run from +x towards +y (clockwise on screen). The range is
/// normalized to a start in `[0, 360)` and a sweep of `(end - start) mod 360`,
/// so start 350 / end 10 is a 20 degree wedge across 0. A non-zero multiple
/// of 360 is a full disc; equal start and end is empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub center: Point,
    pub radius: f32,
    pub start_angle: f32,
    pub end_angle: f32,
}

impl Default for Sector {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 360.0)
    }
}

impl Sector {
    pub fn new(center_x: f32, center_y: f32, radius: f32, start_angle: f32, end_angle: f32) -> Self {
        Self {
            center: Point::new(center_x, center_y),
            radius,
            start_angle,
            end_angle,
        }
    }

    pub fn set_angles(&mut self, start_angle: f32, end_angle: f32) -> &mut Self {
        self.start_angle = start_angle;
        self.end_angle = end_angle;
        self
    }

    /// Normalized `(start, sweep)`, start in `[0, 360)`, sweep in `[0, 360]`
    pub fn normalized(&self) -> (f32, f32) {
        normalize_sweep(self.start_angle, self.end_angle)
    }

    pub fn is_full(&self) -> bool {
        self.normalized().1 >= 360.0
    }

    /// Whether the direction `angle` (degrees) lies inside the wedge
    pub fn covers_angle(&self, angle: f32) -> bool {
        let (start, sweep) = self.normalized();
        sweep >= 360.0 || normalize_degrees(angle - start) <= sweep
    }

    /// Point on the rim at `angle` degrees
    pub fn rim_point(&self, angle: f32) -> Point {
        let (sin, cos) = angle.to_radians().sin_cos();
        Point::new(
            self.center.x + self.radius * cos,
            self.center.y + self.radius * sin,
        )
    }
}

/// Shared by the geometry and the rasterizer so both agree on the wedge
pub(crate) fn normalize_sweep(start_angle: f32, end_angle: f32) -> (f32, f32) {
    let start = normalize_degrees(start_angle);
    let raw = end_angle - start_angle;
    if raw == 0.0 || !raw.is_finite() {
        return (start, 0.0);
    }
    let sweep = normalize_degrees(raw);
    if sweep == 0.0 {
        // A non-zero multiple of 360
        (start, 360.0)
    } else {
        (start, sweep)
    }
}

impl From<Sector> for Point {
    fn from(sector: Sector) -> Point {
        sector.center
    }
}

impl Geometry for Sector {
    fn translate(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.center.translate(dx, dy);
        self
    }

    fn scale_xy(&mut self, fx: f32, fy: f32) -> &mut Self {
        self.center.scale_xy(fx, fy);
        self.radius *= radius_scale(fx, fy);
        self
    }

    fn scale_on_self_xy(&mut self, fx: f32, fy: f32) -> &mut Self {
        self.radius *= radius_scale(fx, fy);
        self
    }

    fn rotate_about(&mut self, angle: f32, pivot: Point) -> &mut Self {
        self.center.rotate(angle, pivot);
        self.start_angle += angle;
        self.end_angle += angle;
        self
    }

    fn contains(&self, point: Point) -> bool {
        if self.radius <= 0.0 {
            return false;
        }
        let d = point - self.center;
        if d.length() > self.radius {
            return false;
        }
        if d.x == 0.0 && d.y == 0.0 {
            return self.normalized().1 > 0.0;
        }
        self.covers_angle(d.y.atan2(d.x).to_degrees())
    }

    /// Center, both arc endpoints, and every axis extreme inside the sweep
    fn bounding_box(&self) -> BoundingBox {
        let (start, sweep) = self.normalized();
        let mut points = vec![
            self.center,
            self.rim_point(start),
            self.rim_point(start + sweep),
        ];
        for axis in [0.0_f32, 90.0, 180.0, 270.0] {
            if self.covers_angle(axis) {
                points.push(self.rim_point(axis));
            }
        }
        BoundingBox::from_points(&points)
    }

    fn center(&self) -> Point {
        self.center
    }
}
