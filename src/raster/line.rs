//! Lines, polylines and dots

use log::debug;

use crate::display::PixelBuffer;
use crate::geometry::{BoundingBox, Point};

use super::{
    all_finite, band_coverage, edge_coverage, interval_coverage, paint_mask, positive,
    CoverageMask, Paint,
};

/// Raise `mask` with a butt-capped segment of total width `width`
pub(crate) fn accumulate_segment(mask: &mut CoverageMask, a: Point, b: Point, width: f32) {
    let d = b - a;
    let len = d.length();
    if len <= f32::EPSILON {
        return;
    }
    let dir = d / len;
    let normal = Point::new(-dir.y, dir.x);
    let half = width / 2.0;

    let bounds = BoundingBox::from_points(&[a, b]).inflate(half + 1.0);
    for y in mask.rows(bounds.top(), bounds.bottom()) {
        for x in mask.columns(bounds.left(), bounds.right()) {
            let rel = Point::new(x as f32, y as f32) - a;
            let across = band_coverage(rel.dot(normal), half);
            if across <= 0.0 {
                continue;
            }
            let along = interval_coverage(rel.dot(dir), len);
            mask.raise(x, y, across * along);
        }
    }
}

/// Raise `mask` with a disc of the given diameter
pub(crate) fn accumulate_disc(mask: &mut CoverageMask, center: Point, diameter: f32) {
    let r = diameter / 2.0;
    // Tiny discs can't be more opaque than they are wide
    let cap = diameter.min(1.0);
    for y in mask.rows(center.y - r - 1.0, center.y + r + 1.0) {
        for x in mask.columns(center.x - r - 1.0, center.x + r + 1.0) {
            let d = Point::new(x as f32, y as f32).distance_to(center);
            let c = edge_coverage(r - d).min(cap);
            if c > 0.0 {
                mask.raise(x, y, c);
            }
        }
    }
}

fn stroke_bounds(points: &[Point], width: f32) -> BoundingBox {
    BoundingBox::from_points(points).inflate(width / 2.0 + 1.0)
}

/// Drop vertices that repeat their predecessor, so zero-length segments
/// contribute neither area nor joins
fn distinct_vertices(points: &[Point], closed: bool) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last().map_or(true, |&last| last.distance_to(p) > f32::EPSILON) {
            out.push(p);
        }
    }
    if closed && out.len() > 1 && out[0].distance_to(out[out.len() - 1]) <= f32::EPSILON {
        out.pop();
    }
    out
}

/// Stroke a connected run of segments with round joins.
///
/// Open runs have butt ends; closed runs also join the last vertex back to
/// the first. Pieces are combined with `max`, so a translucent stroke never
/// darkens where its segments overlap.
pub fn stroke_polyline(
    buffer: &mut PixelBuffer,
    points: &[Point],
    closed: bool,
    width: f32,
    paint: &Paint,
) {
    if points.len() < 2 || !positive(width) || !all_finite(points) {
        debug!("polyline skipped: {} points, width {}", points.len(), width);
        return;
    }
    if paint.is_invisible() {
        return;
    }
    let points = distinct_vertices(points, closed);
    if points.len() < 2 {
        return;
    }
    let points = points.as_slice();
    let Some(mut mask) = CoverageMask::new(
        buffer.width(),
        buffer.height(),
        stroke_bounds(points, width),
    ) else {
        return;
    };

    for seg in points.windows(2) {
        accumulate_segment(&mut mask, seg[0], seg[1], width);
    }
    if closed && points.len() > 2 {
        accumulate_segment(&mut mask, points[points.len() - 1], points[0], width);
    }

    let joins: &[Point] = if closed {
        points
    } else {
        &points[1..points.len() - 1]
    };
    for &p in joins {
        accumulate_disc(&mut mask, p, width);
    }

    paint_mask(buffer, mask, paint);
}

/// Single butt-capped segment
pub fn draw_line(buffer: &mut PixelBuffer, start: Point, end: Point, width: f32, paint: &Paint) {
    stroke_polyline(buffer, &[start, end], false, width, paint);
}

/// A disc of `diameter` at every point
pub fn draw_dots(buffer: &mut PixelBuffer, points: &[Point], diameter: f32, paint: &Paint) {
    if points.is_empty() || !positive(diameter) || !all_finite(points) {
        return;
    }
    if paint.is_invisible() {
        return;
    }
    let Some(mut mask) = CoverageMask::new(
        buffer.width(),
        buffer.height(),
        stroke_bounds(points, diameter),
    ) else {
        return;
    };
    for &p in points {
        accumulate_disc(&mut mask, p, diameter);
    }
    paint_mask(buffer, mask, paint);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend::BlendMode;
    use crate::color::Color;

    fn paint(color: Color) -> Paint {
        Paint::new(color).anti_alias(true)
    }

    #[test]
    fn test_horizontal_line_exact_coverage() {
        let mut buffer = PixelBuffer::new(20, 10, Color::WHITE);
        draw_line(
            &mut buffer,
            Point::new(2.0, 5.0),
            Point::new(12.0, 5.0),
            3.0,
            &paint(Color::BLACK),
        );
        // Rows 4..=6 fully inside the 3px band
        for y in 4..=6 {
            assert_eq!(buffer.get(7, y), Some(Color::BLACK), "row {y}");
        }
        assert_eq!(buffer.get(7, 3), Some(Color::WHITE));
        assert_eq!(buffer.get(7, 7), Some(Color::WHITE));
        // Butt end: the endpoint pixel is half covered, beyond is empty
        let end = buffer.get(12, 5).unwrap();
        assert!(end.r() > 100 && end.r() < 160);
        assert_eq!(buffer.get(14, 5), Some(Color::WHITE));
    }

    #[test]
    fn test_translucent_polyline_never_double_blends() {
        let mut buffer = PixelBuffer::new(30, 30, Color::WHITE);
        let points = [
            Point::new(5.0, 5.0),
            Point::new(20.0, 5.0),
            Point::new(20.0, 20.0),
        ];
        let p = paint(Color::BLACK).opacity(128);
        stroke_polyline(&mut buffer, &points, false, 4.0, &p);
        let corner = buffer.get(20, 5).unwrap();
        let straight = buffer.get(12, 5).unwrap();
        assert_eq!(corner, straight);
    }

    #[test]
    fn test_closed_polyline_has_closing_segment() {
        let mut buffer = PixelBuffer::new(30, 30, Color::WHITE);
        let points = [
            Point::new(5.0, 5.0),
            Point::new(25.0, 5.0),
            Point::new(25.0, 25.0),
        ];
        stroke_polyline(&mut buffer, &points, true, 2.0, &paint(Color::BLACK));
        // On the diagonal back to the start
        assert_ne!(buffer.get(15, 15), Some(Color::WHITE));
        let mut open = PixelBuffer::new(30, 30, Color::WHITE);
        stroke_polyline(&mut open, &points, false, 2.0, &paint(Color::BLACK));
        assert_eq!(open.get(15, 15), Some(Color::WHITE));
    }

    #[test]
    fn test_degenerate_input_draws_nothing() {
        let mut buffer = PixelBuffer::new(10, 10, Color::WHITE);
        let before = buffer.clone();
        let p = paint(Color::BLACK);
        draw_line(&mut buffer, Point::new(1.0, 1.0), Point::new(f32::NAN, 3.0), 2.0, &p);
        draw_line(&mut buffer, Point::new(1.0, 1.0), Point::new(8.0, 8.0), 0.0, &p);
        draw_line(&mut buffer, Point::new(1.0, 1.0), Point::new(8.0, 8.0), -2.0, &p);
        stroke_polyline(&mut buffer, &[Point::new(1.0, 1.0)], false, 2.0, &p);
        draw_dots(&mut buffer, &[], 3.0, &p);
        draw_line(&mut buffer, Point::new(-50.0, -50.0), Point::new(-20.0, -5.0), 2.0, &p);
        assert_eq!(buffer, before);
    }

    #[test]
    fn test_collapsed_polyline_draws_nothing() {
        let mut buffer = PixelBuffer::new(10, 10, Color::WHITE);
        let before = buffer.clone();
        let p = paint(Color::BLACK);
        let same = [Point::new(5.0, 5.0); 4];
        stroke_polyline(&mut buffer, &same, true, 3.0, &p);
        stroke_polyline(&mut buffer, &same, false, 3.0, &p);
        draw_line(&mut buffer, Point::new(5.0, 5.0), Point::new(5.0, 5.0), 3.0, &p);
        assert_eq!(buffer, before);
    }

    #[test]
    fn test_repeated_vertex_keeps_butt_end() {
        let mut buffer = PixelBuffer::new(20, 10, Color::WHITE);
        let points = [
            Point::new(2.0, 5.0),
            Point::new(2.0, 5.0),
            Point::new(12.0, 5.0),
        ];
        stroke_polyline(&mut buffer, &points, false, 3.0, &paint(Color::BLACK));
        // No round join at the doubled start point
        assert_eq!(buffer.get(1, 5), Some(Color::WHITE));
        assert_eq!(buffer.get(7, 5), Some(Color::BLACK));
    }

    #[test]
    fn test_dots_and_aliased_mode() {
        let mut buffer = PixelBuffer::new(10, 10, Color::WHITE);
        let p = Paint::new(Color::RED).anti_alias(false).mode(BlendMode::Alpha);
        draw_dots(&mut buffer, &[Point::new(4.0, 4.0)], 3.0, &p);
        assert_eq!(buffer.get(4, 4), Some(Color::RED));
        assert_eq!(buffer.get(5, 4), Some(Color::RED));
        assert_eq!(buffer.get(6, 4), Some(Color::WHITE));
        // Hard edges only: no blended pixels anywhere
        assert!(buffer
            .pixels()
            .iter()
            .all(|&c| c == Color::RED || c == Color::WHITE));
    }
}
