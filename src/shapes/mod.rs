//! Shape variants and the closed `Shape` sum type

mod path;
mod polygon;
mod ray;
mod rect;
mod round;

pub use path::Path;
pub use polygon::{Line, Points, Polygon, Triangle};
pub use ray::Ray;
pub use rect::Rect;
pub use round::{Circle, Ellipse, Sector};

pub(crate) use rect::corner_points;
pub(crate) use round::normalize_sweep;

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Geometry, Point};

/// Any drawable primitive.
///
/// Serialized with a `type` tag, e.g.
/// `{"type": "circle", "center": {"x": 50, "y": 50}, "radius": 20}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Points(Points),
    Line(Line),
    Polygon(Polygon),
    Rect(Rect),
    Triangle(Triangle),
    Circle(Circle),
    Ellipse(Ellipse),
    Sector(Sector),
    Ray(Ray),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Shape::Points($s) => $body,
            Shape::Line($s) => $body,
            Shape::Polygon($s) => $body,
            Shape::Rect($s) => $body,
            Shape::Triangle($s) => $body,
            Shape::Circle($s) => $body,
            Shape::Ellipse($s) => $body,
            Shape::Sector($s) => $body,
            Shape::Ray($s) => $body,
        }
    };
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Points(_) => "points",
            Shape::Line(_) => "line",
            Shape::Polygon(_) => "polygon",
            Shape::Rect(_) => "rect",
            Shape::Triangle(_) => "triangle",
            Shape::Circle(_) => "circle",
            Shape::Ellipse(_) => "ellipse",
            Shape::Sector(_) => "sector",
            Shape::Ray(_) => "ray",
        }
    }
}

impl Geometry for Shape {
    fn translate(&mut self, dx: f32, dy: f32) -> &mut Self {
        dispatch!(self, s => { s.translate(dx, dy); });
        self
    }

    fn scale_xy(&mut self, fx: f32, fy: f32) -> &mut Self {
        dispatch!(self, s => { s.scale_xy(fx, fy); });
        self
    }

    fn scale_on_self_xy(&mut self, fx: f32, fy: f32) -> &mut Self {
        dispatch!(self, s => { s.scale_on_self_xy(fx, fy); });
        self
    }

    fn rotate_about(&mut self, angle: f32, pivot: Point) -> &mut Self {
        dispatch!(self, s => { s.rotate_about(angle, pivot); });
        self
    }

    fn contains(&self, point: Point) -> bool {
        dispatch!(self, s => s.contains(point))
    }

    fn bounding_box(&self) -> BoundingBox {
        dispatch!(self, s => s.bounding_box())
    }

    fn center(&self) -> Point {
        dispatch!(self, s => Geometry::center(s))
    }
}

macro_rules! shape_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Shape {
                fn from(shape: $variant) -> Self {
                    Shape::$variant(shape)
                }
            }
        )*
    };
}

shape_from!(Points, Line, Polygon, Rect, Triangle, Circle, Ellipse, Sector, Ray);

impl From<Path> for Shape {
    fn from(path: Path) -> Self {
        Shape::Polygon(path.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_tagged() {
        let shape = Shape::from(Circle::new(50.0, 50.0, 20.0));
        let json = serde_json::to_string(&shape).unwrap();
        assert!(json.contains("\"type\":\"circle\""));
        let back: Shape = serde_json::from_str(&json).unwrap();
        assert_eq!(back, shape);

        let rect: Shape = serde_json::from_str(
            r#"{"type":"rect","center":{"x":1,"y":2},"width":4,"height":6}"#,
        )
        .unwrap();
        assert_eq!(rect.bounding_box(), BoundingBox::new(-1.0, -1.0, 4.0, 6.0));
    }

    #[test]
    fn test_enum_dispatch_matches_variant() {
        let mut shapes: Vec<Shape> = vec![
            Line::from_coords(0.0, 0.0, 10.0, 0.0).into(),
            Rect::from_xywh(0.0, 0.0, 10.0, 4.0).into(),
            Sector::new(0.0, 0.0, 5.0, 0.0, 90.0).into(),
            Ray::new(Point::ORIGIN, 10.0, 0.0).into(),
        ];
        for shape in &mut shapes {
            let before = shape.center();
            shape.translate(3.0, 4.0);
            let after = shape.center();
            assert!((after.x - before.x - 3.0).abs() < 1e-4, "{}", shape.name());
            assert!((after.y - before.y - 4.0).abs() < 1e-4, "{}", shape.name());
        }
    }

    #[test]
    fn test_bounding_boxes_cover_vertices() {
        let rect = Rect::new(50.0, 50.0, 40.0, 20.0, 30.0);
        let bb = Shape::from(rect.clone()).bounding_box();
        for v in rect.vertices() {
            assert!(bb.inflate(1e-3).contains_point(*v));
        }
        let ellipse = Ellipse::new(0.0, 0.0, 30.0, 10.0, 45.0);
        let bb = Shape::from(ellipse).bounding_box();
        for deg in (0..360).step_by(5) {
            let (s, c) = (deg as f32).to_radians().sin_cos();
            let local = Point::new(15.0 * c, 5.0 * s);
            let world = local.rotated(45.0, Point::ORIGIN);
            assert!(bb.inflate(1e-3).contains_point(world));
        }
    }
}
