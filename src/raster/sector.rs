//! Pie slices: disc intersected with an angular wedge

use log::debug;

use crate::display::PixelBuffer;
use crate::geometry::{Geometry, Point};
use crate::shapes::{normalize_sweep, Sector};

use super::line::accumulate_segment;
use super::{band_coverage, edge_coverage, paint_mask, positive, CoverageMask, Paint};

/// Signed distance field of a sector, positive inside
#[derive(Debug, Clone, Copy)]
struct Wedge {
    center: Point,
    radius: f32,
    start: f32,
    sweep: f32,
    /// Inward normals of the start and end radii
    start_normal: Point,
    end_normal: Point,
}

impl Wedge {
    fn new(sector: &Sector) -> Option<Self> {
        let (start, sweep) = normalize_sweep(sector.start_angle, sector.end_angle);
        if !sector.center.is_finite() || !positive(sector.radius) || sweep <= 0.0 {
            return None;
        }
        let end = start + sweep;
        let (ss, cs) = start.to_radians().sin_cos();
        let (se, ce) = end.to_radians().sin_cos();
        Some(Self {
            center: sector.center,
            radius: sector.radius,
            start,
            sweep,
            start_normal: Point::new(-ss, cs),
            end_normal: Point::new(se, -ce),
        })
    }

    fn is_full(&self) -> bool {
        self.sweep >= 360.0
    }

    /// Distance inside the angular wedge (ignoring the radius)
    fn angular_distance(&self, p: Point) -> f32 {
        if self.is_full() {
            return f32::INFINITY;
        }
        let d = p - self.center;
        let hs = d.dot(self.start_normal);
        let he = d.dot(self.end_normal);
        if self.sweep <= 180.0 {
            hs.min(he)
        } else {
            hs.max(he)
        }
    }

    fn rim_distance(&self, p: Point) -> f32 {
        self.radius - p.distance_to(self.center)
    }

    fn rim_point(&self, angle: f32) -> Point {
        let (sin, cos) = angle.to_radians().sin_cos();
        self.center + Point::new(cos, sin) * self.radius
    }
}

fn sector_mask(buffer: &PixelBuffer, sector: &Sector, margin: f32) -> Option<CoverageMask> {
    CoverageMask::new(
        buffer.width(),
        buffer.height(),
        sector.bounding_box().inflate(margin),
    )
}

pub fn fill_sector(buffer: &mut PixelBuffer, sector: &Sector, paint: &Paint) {
    let Some(wedge) = Wedge::new(sector) else {
        debug!("sector fill skipped: {:?}", sector);
        return;
    };
    if paint.is_invisible() {
        return;
    }
    let Some(mut mask) = sector_mask(buffer, sector, 1.0) else {
        return;
    };
    let r = wedge.radius + 1.0;
    let c = wedge.center;
    for y in mask.rows(c.y - r, c.y + r) {
        for x in mask.columns(c.x - r, c.x + r) {
            let p = Point::new(x as f32, y as f32);
            let sd = wedge.rim_distance(p).min(wedge.angular_distance(p));
            let coverage = edge_coverage(sd);
            if coverage > 0.0 {
                mask.raise(x, y, coverage);
            }
        }
    }
    paint_mask(buffer, mask, paint);
}

/// Stroke the rim (`draw_arc`) and/or both radii (`draw_radial_edges`).
/// A full circle has no radial edges.
pub fn stroke_sector(
    buffer: &mut PixelBuffer,
    sector: &Sector,
    stroke_width: f32,
    draw_arc: bool,
    draw_radial_edges: bool,
    paint: &Paint,
) {
    let Some(wedge) = Wedge::new(sector) else {
        debug!("sector stroke skipped: {:?}", sector);
        return;
    };
    if !positive(stroke_width) || !(draw_arc || draw_radial_edges) || paint.is_invisible() {
        return;
    }
    let half = stroke_width / 2.0;
    let Some(mut mask) = sector_mask(buffer, sector, half + 1.0) else {
        return;
    };

    if draw_arc {
        let r = wedge.radius + half + 1.0;
        let c = wedge.center;
        for y in mask.rows(c.y - r, c.y + r) {
            for x in mask.columns(c.x - r, c.x + r) {
                let p = Point::new(x as f32, y as f32);
                let band = band_coverage(wedge.rim_distance(p), half);
                if band <= 0.0 {
                    continue;
                }
                mask.raise(x, y, band * edge_coverage(wedge.angular_distance(p)));
            }
        }
    }

    if draw_radial_edges && !wedge.is_full() {
        let start = wedge.rim_point(wedge.start);
        let end = wedge.rim_point(wedge.start + wedge.sweep);
        accumulate_segment(&mut mask, wedge.center, start, stroke_width);
        accumulate_segment(&mut mask, wedge.center, end, stroke_width);
    }

    paint_mask(buffer, mask, paint);
}
