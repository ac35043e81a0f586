//! Rounded-rect outlines; plain rects go straight to the polygon path

use std::f32::consts::FRAC_PI_2;

use crate::geometry::Point;
use crate::shapes::corner_points;

/// Upper bound on segments per quarter arc
pub const MAX_CORNER_SEGMENTS: usize = 64;

/// Segments per quarter arc: roughly one per 2px of arc length
fn corner_segments(radius: f32) -> usize {
    ((radius * FRAC_PI_2 / 2.0).ceil() as usize).clamp(2, MAX_CORNER_SEGMENTS)
}

/// Outline of a rounded rect, clockwise on screen starting at the top-left arc.
///
/// The radius is clamped to `min(w, h) / 2`; a non-positive radius yields the
/// four plain corners. Negative sizes are taken as their absolute value.
pub fn round_rect_vertices(
    center: Point,
    width: f32,
    height: f32,
    radius: f32,
    rotation: f32,
) -> Vec<Point> {
    let (w, h) = (width.abs(), height.abs());
    let r = radius.min(w.min(h) / 2.0);
    if radius.is_nan() || r <= 0.0 {
        return corner_points(center, w, h, rotation).to_vec();
    }

    let (hw, hh) = (w / 2.0 - r, h / 2.0 - r);
    // Arc centers and start angles (degrees, Y-down): TL, TR, BR, BL
    let arcs = [
        (Point::new(center.x - hw, center.y - hh), 180.0_f32),
        (Point::new(center.x + hw, center.y - hh), 270.0),
        (Point::new(center.x + hw, center.y + hh), 0.0),
        (Point::new(center.x - hw, center.y + hh), 90.0),
    ];

    let segments = corner_segments(r);
    let mut outline = Vec::with_capacity(4 * (segments + 1));
    for (arc_center, start) in arcs {
        for i in 0..=segments {
            let angle = (start + 90.0 * i as f32 / segments as f32).to_radians();
            let (sin, cos) = angle.sin_cos();
            outline.push(Point::new(arc_center.x + r * cos, arc_center.y + r * sin));
        }
    }

    if rotation != 0.0 {
        for p in &mut outline {
            p.rotate(rotation, center);
        }
    }
    outline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;

    #[test]
    fn test_zero_radius_is_plain_rect() {
        let outline = round_rect_vertices(Point::new(5.0, 5.0), 4.0, 2.0, 0.0, 0.0);
        assert_eq!(outline.len(), 4);
        assert_eq!(outline[0], Point::new(3.0, 4.0));
    }

    #[test]
    fn test_radius_clamped_and_bounded() {
        let outline = round_rect_vertices(Point::new(0.0, 0.0), 20.0, 10.0, 50.0, 0.0);
        let bb = BoundingBox::from_points(&outline);
        assert!((bb.width - 20.0).abs() < 1e-3);
        assert!((bb.height - 10.0).abs() < 1e-3);
        // Fully rounded ends: every point within the stadium
        for p in &outline {
            let cx = p.x.clamp(-5.0, 5.0);
            assert!(Point::new(cx, 0.0).distance_to(*p) <= 5.0 + 1e-3);
        }
    }

    #[test]
    fn test_segment_count_grows_with_radius() {
        assert!(corner_segments(40.0) > corner_segments(4.0));
        assert_eq!(corner_segments(1e6), MAX_CORNER_SEGMENTS);
        let small = round_rect_vertices(Point::ORIGIN, 10.0, 10.0, 1.0, 0.0);
        assert_eq!(small.len(), 4 * (corner_segments(1.0) + 1));
    }
}
