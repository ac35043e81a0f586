//! Even-odd polygon fill with sub-scanline anti-aliasing

use log::debug;

use crate::display::PixelBuffer;
use crate::geometry::{BoundingBox, Point};

use super::{all_finite, paint_mask, CoverageMask, Paint};

/// Sub-scanlines per pixel row
const SUBSAMPLES: usize = 4;

/// Add the exact horizontal overlap of `[x_left, x_right]` with each pixel
/// of row `y`, weighted by `weight`
fn accumulate_span(mask: &mut CoverageMask, y: i32, x_left: f32, x_right: f32, weight: f32) {
    for x in mask.columns(x_left - 0.5, x_right + 0.5) {
        let px = x as f32;
        let overlap = x_right.min(px + 0.5) - x_left.max(px - 0.5);
        if overlap > 0.0 {
            mask.add(x, y, overlap * weight);
        }
    }
}

/// Fill `vertices` as a closed loop with the even-odd rule.
///
/// Each pixel row is sampled on four sub-scanlines; on each one the edge
/// crossings are sorted and paired into spans. Fewer than 3 vertices fill
/// nothing.
pub fn fill_polygon(buffer: &mut PixelBuffer, vertices: &[Point], paint: &Paint) {
    let n = vertices.len();
    if n < 3 || !all_finite(vertices) {
        debug!("polygon fill skipped: {} vertices", n);
        return;
    }
    if paint.is_invisible() {
        return;
    }
    let bounds = BoundingBox::from_points(vertices);
    let Some(mut mask) = CoverageMask::new(buffer.width(), buffer.height(), bounds.inflate(1.0))
    else {
        return;
    };

    let weight = 1.0 / SUBSAMPLES as f32;
    let mut crossings: Vec<f32> = Vec::with_capacity(n);

    for y in mask.rows(bounds.top() - 0.5, bounds.bottom() + 0.5) {
        for s in 0..SUBSAMPLES {
            let sy = y as f32 - 0.5 + (s as f32 + 0.5) * weight;

            crossings.clear();
            let mut j = n - 1;
            for i in 0..n {
                let (a, b) = (vertices[j], vertices[i]);
                // Half-open in y: a vertex on the scanline counts once
                if (a.y <= sy) != (b.y <= sy) {
                    let t = (sy - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
                j = i;
            }
            crossings.sort_by(f32::total_cmp);

            for pair in crossings.chunks_exact(2) {
                accumulate_span(&mut mask, y, pair[0], pair[1], weight);
            }
        }
    }

    paint_mask(buffer, mask, paint);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn paint() -> Paint {
        Paint::new(Color::RED).anti_alias(true)
    }

    fn square(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }

    #[test]
    fn test_pixel_aligned_square_is_exact() {
        let mut buffer = PixelBuffer::new(10, 10, Color::WHITE);
        // Edges on pixel boundaries: pixels 2..=5 fully covered
        fill_polygon(&mut buffer, &square(1.5, 1.5, 5.5, 5.5), &paint());
        for y in 0..10 {
            for x in 0..10 {
                let inside = (2..=5).contains(&x) && (2..=5).contains(&y);
                let expected = if inside { Color::RED } else { Color::WHITE };
                assert_eq!(buffer.get(x, y), Some(expected), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_boundary_pixels_fractional() {
        let mut buffer = PixelBuffer::new(10, 10, Color::WHITE);
        fill_polygon(&mut buffer, &square(2.0, 1.5, 6.0, 5.5), &paint());
        // Left edge runs through the center of column 2
        let edge = buffer.get(2, 3).unwrap();
        assert_eq!(edge.r(), 255);
        assert!(edge.g() > 100 && edge.g() < 160);
        assert_eq!(buffer.get(4, 3), Some(Color::RED));
    }

    #[test]
    fn test_even_odd_hole() {
        let mut buffer = PixelBuffer::new(20, 20, Color::WHITE);
        // Outer square then inner square, joined into one loop
        let mut loop_points = square(1.5, 1.5, 17.5, 17.5);
        loop_points.push(Point::new(1.5, 1.5));
        loop_points.extend(square(6.5, 6.5, 12.5, 12.5));
        loop_points.push(Point::new(6.5, 6.5));
        fill_polygon(&mut buffer, &loop_points, &paint());
        assert_eq!(buffer.get(3, 3), Some(Color::RED));
        assert_eq!(buffer.get(9, 9), Some(Color::WHITE));
    }

    #[test]
    fn test_two_vertices_fill_nothing() {
        let mut buffer = PixelBuffer::new(10, 10, Color::WHITE);
        let before = buffer.clone();
        fill_polygon(&mut buffer, &[Point::new(1.0, 1.0), Point::new(8.0, 8.0)], &paint());
        fill_polygon(
            &mut buffer,
            &[Point::new(1.0, 1.0), Point::new(8.0, f32::INFINITY), Point::new(2.0, 5.0)],
            &paint(),
        );
        assert_eq!(buffer, before);
    }
}
