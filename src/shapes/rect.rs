use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use crate::geometry::{point_in_polygon, BoundingBox, Geometry, Point};

/// Rectangle given by center, size and rotation (degrees).
///
/// The four corners are derived on first read and cached; every setter
/// drops the cache, so `vertices()` always reflects the current fields.
/// Negative width/height are treated as their absolute value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rect {
    center: Point,
    width: f32,
    height: f32,
    #[serde(default)]
    rotation: f32,
    #[serde(skip)]
    corners: OnceCell<[Point; 4]>,
}

impl Rect {
    pub fn new(center_x: f32, center_y: f32, width: f32, height: f32, rotation: f32) -> Self {
        Self {
            center: Point::new(center_x, center_y),
            width,
            height,
            rotation,
            corners: OnceCell::new(),
        }
    }

    /// Axis-aligned rect from its top-left corner
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x + width / 2.0, y + height / 2.0, width, height, 0.0)
    }

    /// Recover center/size/rotation from four corners in drawing order.
    /// The first edge sets the rotation and width, the second the height.
    pub fn from_corners(corners: [Point; 4]) -> Self {
        let edge = corners[1] - corners[0];
        let center = corners
            .iter()
            .fold(Point::ORIGIN, |acc, &p| acc + p)
            / 4.0;
        Self {
            center,
            width: edge.length(),
            height: corners[2].distance_to(corners[1]),
            rotation: edge.y.atan2(edge.x).to_degrees(),
            corners: OnceCell::new(),
        }
    }

    #[inline]
    fn invalidate(&mut self) {
        self.corners = OnceCell::new();
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_center(&mut self, center: Point) -> &mut Self {
        self.center = center;
        self.invalidate();
        self
    }

    pub fn set_width(&mut self, width: f32) -> &mut Self {
        self.width = width;
        self.invalidate();
        self
    }

    pub fn set_height(&mut self, height: f32) -> &mut Self {
        self.height = height;
        self.invalidate();
        self
    }

    pub fn set_rotation(&mut self, rotation: f32) -> &mut Self {
        self.rotation = rotation;
        self.invalidate();
        self
    }

    /// Corners in order top-left, top-right, bottom-right, bottom-left
    /// (before rotation)
    pub fn vertices(&self) -> &[Point; 4] {
        self.corners.get_or_init(|| {
            corner_points(self.center, self.width, self.height, self.rotation)
        })
    }
}

/// Corners of a rotated rect, negative sizes normalized
pub(crate) fn corner_points(center: Point, width: f32, height: f32, rotation: f32) -> [Point; 4] {
    let hw = width.abs() / 2.0;
    let hh = height.abs() / 2.0;
    let mut corners = [
        Point::new(center.x - hw, center.y - hh),
        Point::new(center.x + hw, center.y - hh),
        Point::new(center.x + hw, center.y + hh),
        Point::new(center.x - hw, center.y + hh),
    ];
    if rotation != 0.0 {
        for c in &mut corners {
            c.rotate(rotation, center);
        }
    }
    corners
}

impl PartialEq for Rect {
    fn eq(&self, other: &Self) -> bool {
        self.center == other.center
            && self.width == other.width
            && self.height == other.height
            && self.rotation == other.rotation
    }
}

impl Geometry for Rect {
    fn translate(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.center.translate(dx, dy);
        self.invalidate();
        self
    }

    /// Center scales about the origin; size scales in the rect's own frame
    fn scale_xy(&mut self, fx: f32, fy: f32) -> &mut Self {
        self.center.scale_xy(fx, fy);
        self.width *= fx.abs();
        self.height *= fy.abs();
        self.invalidate();
        self
    }

    fn scale_on_self_xy(&mut self, fx: f32, fy: f32) -> &mut Self {
        self.width *= fx.abs();
        self.height *= fy.abs();
        self.invalidate();
        self
    }

    fn rotate_about(&mut self, angle: f32, pivot: Point) -> &mut Self {
        self.center.rotate(angle, pivot);
        self.rotation += angle;
        self.invalidate();
        self
    }

    fn contains(&self, point: Point) -> bool {
        point_in_polygon(point.x, point.y, self.vertices())
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.vertices())
    }

    fn center(&self) -> Point {
        self.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertices_follow_setters() {
        let mut rect = Rect::new(10.0, 10.0, 4.0, 2.0, 0.0);
        assert_eq!(rect.vertices()[0], Point::new(8.0, 9.0));
        rect.set_width(8.0);
        assert_eq!(rect.vertices()[0], Point::new(6.0, 9.0));
        rect.translate(1.0, 1.0);
        assert_eq!(rect.vertices()[2], Point::new(15.0, 12.0));
    }

    #[test]
    fn test_negative_size_normalized() {
        let rect = Rect::new(0.0, 0.0, -4.0, -2.0, 0.0);
        assert_eq!(rect.bounding_box(), BoundingBox::new(-2.0, -1.0, 4.0, 2.0));
    }

    #[test]
    fn test_rotated_bounding_box_grows() {
        let rect = Rect::new(50.0, 50.0, 40.0, 20.0, 45.0);
        let bb = rect.bounding_box();
        assert!(bb.width > 40.0 && bb.height > 20.0);
        for v in rect.vertices() {
            assert!(bb.contains_point(*v));
        }
    }

    #[test]
    fn test_rotate_on_self_adds_rotation() {
        let mut rect = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        rect.rotate_on_self(30.0);
        assert_eq!(rect.rotation(), 30.0);
        assert_eq!(rect.center(), Point::new(5.0, 5.0));
        assert!(rect.contains(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_from_corners_round_trip() {
        let rect = Rect::new(3.0, 4.0, 6.0, 2.0, 90.0);
        let rebuilt = Rect::from_corners(*rect.vertices());
        assert!((rebuilt.width() - 6.0).abs() < 1e-4);
        assert!((rebuilt.height() - 2.0).abs() < 1e-4);
        assert!((rebuilt.rotation() - 90.0).abs() < 1e-3);
        assert!(rebuilt.center().distance_to(rect.center()) < 1e-4);
    }
}
