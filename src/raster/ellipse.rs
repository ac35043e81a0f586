//! Circles and (rotated) ellipses via analytic signed distance

use log::debug;

use crate::display::PixelBuffer;
use crate::geometry::{BoundingBox, Point};

use super::{band_coverage, edge_coverage, paint_mask, positive, CoverageMask, Paint};

/// An ellipse in its own frame: semi-axes plus the rotation to undo
#[derive(Debug, Clone, Copy)]
struct EllipseFrame {
    center: Point,
    a: f32,
    b: f32,
    sin: f32,
    cos: f32,
}

impl EllipseFrame {
    fn new(center: Point, a: f32, b: f32, rotation: f32) -> Option<Self> {
        if !center.is_finite() || !positive(a) || !positive(b) || !rotation.is_finite() {
            return None;
        }
        let (sin, cos) = rotation.to_radians().sin_cos();
        Some(Self {
            center,
            a,
            b,
            sin,
            cos,
        })
    }

    fn is_circle(&self) -> bool {
        self.a == self.b
    }

    fn to_local(&self, p: Point) -> Point {
        let d = p - self.center;
        Point::new(d.x * self.cos + d.y * self.sin, -d.x * self.sin + d.y * self.cos)
    }

    /// Signed distance, positive inside. Exact for circles, first-order
    /// (`-f / |grad f|`) for ellipses, which is accurate near the boundary.
    fn signed_distance(&self, p: Point) -> f32 {
        if self.is_circle() {
            return self.a - p.distance_to(self.center);
        }
        let l = self.to_local(p);
        let (a2, b2) = (self.a * self.a, self.b * self.b);
        let f = l.x * l.x / a2 + l.y * l.y / b2 - 1.0;
        let grad = Point::new(2.0 * l.x / a2, 2.0 * l.y / b2).length();
        if grad < 1e-6 {
            return self.a.min(self.b);
        }
        -f / grad
    }

    /// World bounding box of the ellipse grown by `grow` on each axis
    fn bounds(&self, grow: f32) -> BoundingBox {
        let (a, b) = (self.a + grow, self.b + grow);
        let half_w = ((a * self.cos).powi(2) + (b * self.sin).powi(2)).sqrt();
        let half_h = ((a * self.sin).powi(2) + (b * self.cos).powi(2)).sqrt();
        BoundingBox::new(
            self.center.x - half_w,
            self.center.y - half_h,
            2.0 * half_w,
            2.0 * half_h,
        )
    }

    /// World x-interval where row `y` crosses the ellipse grown by `grow`
    fn row_span(&self, y: f32, grow: f32) -> Option<(f32, f32)> {
        let (a, b) = (self.a + grow, self.b + grow);
        let (ia2, ib2) = (1.0 / (a * a), 1.0 / (b * b));
        let (s, c) = (self.sin, self.cos);
        let dy = y - self.center.y;
        // Local frame substituted into x^2/a^2 + y^2/b^2 = 1, solved for dx
        let qa = c * c * ia2 + s * s * ib2;
        let qb = 2.0 * dy * c * s * (ia2 - ib2);
        let qc = dy * dy * (s * s * ia2 + c * c * ib2) - 1.0;
        let disc = qb * qb - 4.0 * qa * qc;
        if disc < 0.0 {
            return None;
        }
        let root = disc.sqrt();
        let x0 = (-qb - root) / (2.0 * qa);
        let x1 = (-qb + root) / (2.0 * qa);
        Some((self.center.x + x0, self.center.x + x1))
    }
}

/// Walk every candidate pixel within `grow` of the outline and raise the
/// mask with `coverage(signed_distance)`
fn rasterize(
    buffer: &mut PixelBuffer,
    frame: &EllipseFrame,
    grow: f32,
    paint: &Paint,
    coverage: impl Fn(f32) -> f32,
) {
    if paint.is_invisible() {
        return;
    }
    let bounds = frame.bounds(grow);
    let Some(mut mask) = CoverageMask::new(buffer.width(), buffer.height(), bounds) else {
        return;
    };
    for y in mask.rows(bounds.top(), bounds.bottom()) {
        let Some((x0, x1)) = frame.row_span(y as f32, grow) else {
            continue;
        };
        for x in mask.columns(x0, x1) {
            let c = coverage(frame.signed_distance(Point::new(x as f32, y as f32)));
            if c > 0.0 {
                mask.raise(x, y, c);
            }
        }
    }
    paint_mask(buffer, mask, paint);
}

pub fn fill_circle(buffer: &mut PixelBuffer, center: Point, radius: f32, paint: &Paint) {
    if !positive(radius) {
        return;
    }
    fill_ellipse(buffer, center, 2.0 * radius, 2.0 * radius, 0.0, paint);
}

pub fn stroke_circle(
    buffer: &mut PixelBuffer,
    center: Point,
    radius: f32,
    stroke_width: f32,
    paint: &Paint,
) {
    if !positive(radius) {
        return;
    }
    stroke_ellipse(
        buffer,
        center,
        2.0 * radius,
        2.0 * radius,
        0.0,
        stroke_width,
        paint,
    );
}

/// Fill an ellipse of full `width` x `height` rotated by `rotation` degrees.
/// The sign of either size is ignored.
pub fn fill_ellipse(
    buffer: &mut PixelBuffer,
    center: Point,
    width: f32,
    height: f32,
    rotation: f32,
    paint: &Paint,
) {
    let (a, b) = (width.abs() / 2.0, height.abs() / 2.0);
    let Some(frame) = EllipseFrame::new(center, a, b, rotation) else {
        debug!("ellipse fill skipped: {}x{} at {:?}", width, height, center);
        return;
    };
    rasterize(buffer, &frame, 1.0, paint, edge_coverage);
}

/// Stroke the band `|sd| <= stroke_width / 2` around the outline
pub fn stroke_ellipse(
    buffer: &mut PixelBuffer,
    center: Point,
    width: f32,
    height: f32,
    rotation: f32,
    stroke_width: f32,
    paint: &Paint,
) {
    let (a, b) = (width.abs() / 2.0, height.abs() / 2.0);
    let Some(frame) = EllipseFrame::new(center, a, b, rotation) else {
        debug!("ellipse stroke skipped: {}x{} at {:?}", width, height, center);
        return;
    };
    if !positive(stroke_width) {
        return;
    }
    let half = stroke_width / 2.0;
    rasterize(buffer, &frame, half + 1.0, paint, |sd| band_coverage(sd, half));
}
