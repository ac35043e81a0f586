//! Canvas: a pixel buffer plus the drawing, compositing and transform calls
//! that target it
//!
//! Shapes are painted fill first, then stroke. How a [`Style`] applies
//! depends on the shape:
//!
//! | shape | painted with |
//! |---|---|
//! | points | a disc of diameter `width` per point, stroke color (fill if the stroke is transparent) |
//! | line, ray | stroke only |
//! | polygon, triangle, circle, ellipse | fill and stroke |
//! | rect | fill and stroke, rounded when `radius > 0` |
//! | sector | fill, then rim and/or radii per `draw_arc` / `draw_radial_edges` |

use std::path::Path as FsPath;

use crate::blend::{self, BlendMode};
use crate::color::Color;
use crate::display::PixelBuffer;
use crate::error::Result;
use crate::geometry::{BoundingBox, Point};
use crate::image::{load_image, ImageDecoder};
use crate::raster::{
    draw_dots, draw_line, fill_circle, fill_ellipse, fill_polygon, fill_sector,
    round_rect_vertices, stroke_circle, stroke_ellipse, stroke_polyline, stroke_sector, Paint,
};
use crate::shapes::{Circle, Ellipse, Line, Polygon, Rect, Sector, Shape, Triangle};
use crate::style::Style;
use crate::text::{self, TextRenderer, TextRequest};
use crate::transform;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Canvas {
    buffer: PixelBuffer,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            buffer: PixelBuffer::new(width, height, background),
        }
    }

    pub fn from_buffer(buffer: PixelBuffer) -> Self {
        Self { buffer }
    }

    /// Decode an image file into a new canvas
    pub fn load_image(path: impl AsRef<FsPath>, decoder: &dyn ImageDecoder) -> Result<Self> {
        load_image(path, decoder).map(Self::from_buffer)
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        self.buffer.get(x, y)
    }

    // ------------------------------------------------------------------------
    // Buffer management
    // ------------------------------------------------------------------------

    pub fn clear(&mut self, color: Color) -> &mut Self {
        self.buffer.clear(color);
        self
    }

    /// Reallocate; previous content is discarded
    pub fn resize(&mut self, width: u32, height: u32, fill: Color) -> &mut Self {
        self.buffer.resize(width, height, fill);
        self
    }

    /// Keep only the region `(x, y, width, height)`
    pub fn crop(&mut self, x: i32, y: i32, width: u32, height: u32) -> &mut Self {
        self.buffer = transform::crop(&self.buffer, x, y, width, height);
        self
    }

    // ------------------------------------------------------------------------
    // Shapes
    // ------------------------------------------------------------------------

    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, style: &Style) -> &mut Self {
        self.draw(&Line::from_coords(x0, y0, x1, y1).into(), style)
    }

    /// Open run of segments, stroke only
    pub fn polyline(&mut self, points: &[Point], style: &Style) -> &mut Self {
        if style.has_stroke() {
            stroke_polyline(
                &mut self.buffer,
                points,
                false,
                style.width,
                &layer(style.stroke, style),
            );
        }
        self
    }

    pub fn polygon(&mut self, vertices: &[Point], style: &Style) -> &mut Self {
        self.draw(&Polygon::from_vertices(vertices.to_vec()).into(), style)
    }

    /// Axis-aligned rect from its top-left corner
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, style: &Style) -> &mut Self {
        self.draw(&Rect::from_xywh(x, y, width, height).into(), style)
    }

    pub fn rotated_rect(
        &mut self,
        cx: f32,
        cy: f32,
        width: f32,
        height: f32,
        angle: f32,
        style: &Style,
    ) -> &mut Self {
        self.draw(&Rect::new(cx, cy, width, height, angle).into(), style)
    }

    /// Rounded rect from its top-left corner; `radius` overrides the style's
    pub fn round_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        style: &Style,
    ) -> &mut Self {
        let style = style.radius(radius);
        self.draw(&Rect::from_xywh(x, y, width, height).into(), &style)
    }

    pub fn rotated_round_rect(
        &mut self,
        cx: f32,
        cy: f32,
        width: f32,
        height: f32,
        radius: f32,
        angle: f32,
        style: &Style,
    ) -> &mut Self {
        let style = style.radius(radius);
        self.draw(&Rect::new(cx, cy, width, height, angle).into(), &style)
    }

    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32, style: &Style) -> &mut Self {
        self.draw(&Circle::new(cx, cy, radius).into(), style)
    }

    /// Ellipse of full `width x height` centered on `(cx, cy)`
    pub fn ellipse(&mut self, cx: f32, cy: f32, width: f32, height: f32, style: &Style) -> &mut Self {
        self.rotated_ellipse(cx, cy, width, height, 0.0, style)
    }

    pub fn rotated_ellipse(
        &mut self,
        cx: f32,
        cy: f32,
        width: f32,
        height: f32,
        angle: f32,
        style: &Style,
    ) -> &mut Self {
        self.draw(&Ellipse::new(cx, cy, width, height, angle).into(), style)
    }

    pub fn triangle(&mut self, a: Point, b: Point, c: Point, style: &Style) -> &mut Self {
        self.draw(&Triangle::new(a, b, c).into(), style)
    }

    /// Pie slice from `start_angle` to `end_angle` (degrees, clockwise on
    /// screen)
    pub fn sector(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        style: &Style,
    ) -> &mut Self {
        self.draw(&Sector::new(cx, cy, radius, start_angle, end_angle).into(), style)
    }

    /// Paint any shape with `style`
    pub fn draw(&mut self, shape: &Shape, style: &Style) -> &mut Self {
        paint_shape(&mut self.buffer, shape, style);
        self
    }

    /// Paint every shape with the same style
    pub fn draw_batch(&mut self, shapes: &[Shape], style: &Style) -> &mut Self {
        for shape in shapes {
            paint_shape(&mut self.buffer, shape, style);
        }
        self
    }

    /// Paint shape `i` with `styles[i]`; shapes past the end of `styles`
    /// reuse the last style, or the default style when `styles` is empty
    pub fn draw_batch_styled(&mut self, shapes: &[Shape], styles: &[Style]) -> &mut Self {
        let fallback = styles.last().copied().unwrap_or_default();
        for (i, shape) in shapes.iter().enumerate() {
            let style = styles.get(i).unwrap_or(&fallback);
            paint_shape(&mut self.buffer, shape, style);
        }
        self
    }

    // ------------------------------------------------------------------------
    // Compositing
    // ------------------------------------------------------------------------

    /// Blend `src` with its top-left at `(x, y)`
    pub fn blend(&mut self, src: &PixelBuffer, x: i32, y: i32, opacity: u8, mode: BlendMode) -> &mut Self {
        blend::blend(src, &mut self.buffer, x, y, opacity, mode);
        self
    }

    pub fn copy_blend(&mut self, src: &PixelBuffer, x: i32, y: i32, opacity: u8) -> &mut Self {
        self.blend(src, x, y, opacity, BlendMode::Copy)
    }

    pub fn alpha_blend(&mut self, src: &PixelBuffer, x: i32, y: i32, opacity: u8) -> &mut Self {
        self.blend(src, x, y, opacity, BlendMode::Alpha)
    }

    pub fn add_blend(&mut self, src: &PixelBuffer, x: i32, y: i32, opacity: u8) -> &mut Self {
        self.blend(src, x, y, opacity, BlendMode::Add)
    }

    pub fn multiply_blend(&mut self, src: &PixelBuffer, x: i32, y: i32, opacity: u8) -> &mut Self {
        self.blend(src, x, y, opacity, BlendMode::Multiply)
    }

    pub fn screen_blend(&mut self, src: &PixelBuffer, x: i32, y: i32, opacity: u8) -> &mut Self {
        self.blend(src, x, y, opacity, BlendMode::Screen)
    }

    pub fn overlay_blend(&mut self, src: &PixelBuffer, x: i32, y: i32, opacity: u8) -> &mut Self {
        self.blend(src, x, y, opacity, BlendMode::Overlay)
    }

    pub fn dest_alpha_blend(&mut self, src: &PixelBuffer, x: i32, y: i32, opacity: u8) -> &mut Self {
        self.blend(src, x, y, opacity, BlendMode::DestAlpha)
    }

    /// Alpha-composite another canvas
    pub fn draw_canvas(&mut self, other: &Canvas, x: i32, y: i32, opacity: u8) -> &mut Self {
        self.alpha_blend(&other.buffer, x, y, opacity)
    }

    // ------------------------------------------------------------------------
    // Transformed draws and copies
    // ------------------------------------------------------------------------

    /// Composite `src` scaled by `(sx, sy)` and rotated by `angle`, centered
    /// on `(cx, cy)`
    pub fn draw_transformed(
        &mut self,
        src: &PixelBuffer,
        cx: f32,
        cy: f32,
        sx: f32,
        sy: f32,
        angle: f32,
        opacity: u8,
    ) -> &mut Self {
        transform::draw_transformed(&mut self.buffer, src, cx, cy, sx, sy, angle, opacity);
        self
    }

    pub fn draw_scaled(&mut self, src: &PixelBuffer, cx: f32, cy: f32, sx: f32, sy: f32, opacity: u8) -> &mut Self {
        transform::draw_scaled(&mut self.buffer, src, cx, cy, sx, sy, opacity);
        self
    }

    pub fn draw_rotated(&mut self, src: &PixelBuffer, cx: f32, cy: f32, angle: f32, opacity: u8) -> &mut Self {
        transform::draw_rotated(&mut self.buffer, src, cx, cy, angle, opacity);
        self
    }

    pub fn draw_scaled_rotated(
        &mut self,
        src: &PixelBuffer,
        cx: f32,
        cy: f32,
        factor: f32,
        angle: f32,
        opacity: u8,
    ) -> &mut Self {
        transform::draw_scaled_rotated(&mut self.buffer, src, cx, cy, factor, angle, opacity);
        self
    }

    pub fn create_cropped(&self, x: i32, y: i32, width: u32, height: u32) -> Canvas {
        Canvas::from_buffer(transform::crop(&self.buffer, x, y, width, height))
    }

    pub fn create_scaled(&self, sx: f32, sy: f32) -> Canvas {
        Canvas::from_buffer(transform::scale(&self.buffer, sx, sy))
    }

    pub fn create_rotated(&self, angle: f32) -> Canvas {
        Canvas::from_buffer(transform::rotate(&self.buffer, angle))
    }

    pub fn create_scaled_rotated(&self, factor: f32, angle: f32) -> Canvas {
        Canvas::from_buffer(transform::scale_rotate(&self.buffer, factor, angle))
    }

    // ------------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------------

    pub fn text(&mut self, renderer: &dyn TextRenderer, request: &TextRequest<'_>, x: f32, y: f32) -> bool {
        text::draw_text(&mut self.buffer, renderer, request, x, y)
    }

    pub fn text_centered(
        &mut self,
        renderer: &dyn TextRenderer,
        request: &TextRequest<'_>,
        cx: f32,
        cy: f32,
    ) -> bool {
        text::draw_text_centered(&mut self.buffer, renderer, request, cx, cy)
    }

    pub fn text_in_rect(
        &mut self,
        renderer: &dyn TextRenderer,
        request: &TextRequest<'_>,
        rect: BoundingBox,
    ) -> bool {
        text::draw_text_in_rect(&mut self.buffer, renderer, request, rect)
    }

    /// Returns the font size used
    pub fn text_fit_rect(
        &mut self,
        renderer: &dyn TextRenderer,
        request: &TextRequest<'_>,
        rect: BoundingBox,
    ) -> Option<u32> {
        text::draw_text_fit_rect(&mut self.buffer, renderer, request, rect)
    }
}

impl From<PixelBuffer> for Canvas {
    fn from(buffer: PixelBuffer) -> Self {
        Self::from_buffer(buffer)
    }
}

impl From<Canvas> for PixelBuffer {
    fn from(canvas: Canvas) -> Self {
        canvas.buffer
    }
}

fn layer(color: Color, style: &Style) -> Paint {
    Paint::new(color).opacity(style.opacity_u8())
}

/// Fill then stroke a closed outline
fn paint_outline(buffer: &mut PixelBuffer, outline: &[Point], style: &Style) {
    if style.has_fill() {
        fill_polygon(buffer, outline, &layer(style.fill, style));
    }
    if style.has_stroke() {
        stroke_polyline(buffer, outline, true, style.width, &layer(style.stroke, style));
    }
}

fn paint_shape(buffer: &mut PixelBuffer, shape: &Shape, style: &Style) {
    match shape {
        Shape::Points(points) => {
            let color = if style.stroke.is_transparent() {
                style.fill
            } else {
                style.stroke
            };
            draw_dots(buffer, points.vertices(), style.width, &layer(color, style));
        }
        Shape::Line(line) => {
            if style.has_stroke() {
                draw_line(buffer, line.start(), line.end(), style.width, &layer(style.stroke, style));
            }
        }
        Shape::Ray(ray) => {
            if style.has_stroke() {
                draw_line(buffer, ray.start, ray.end(), style.width, &layer(style.stroke, style));
            }
        }
        Shape::Polygon(polygon) => paint_outline(buffer, polygon.vertices(), style),
        Shape::Triangle(triangle) => paint_outline(buffer, triangle.vertices(), style),
        Shape::Rect(rect) => {
            // A collapsed rect has no area and no outline
            if !(rect.width().abs() > 0.0 && rect.height().abs() > 0.0) {
                return;
            }
            if style.radius > 0.0 {
                let outline = round_rect_vertices(
                    rect.center(),
                    rect.width(),
                    rect.height(),
                    style.radius,
                    rect.rotation(),
                );
                paint_outline(buffer, &outline, style);
            } else {
                paint_outline(buffer, rect.vertices(), style);
            }
        }
        Shape::Circle(circle) => {
            if style.has_fill() {
                fill_circle(buffer, circle.center, circle.radius, &layer(style.fill, style));
            }
            if style.has_stroke() {
                stroke_circle(
                    buffer,
                    circle.center,
                    circle.radius,
                    style.width,
                    &layer(style.stroke, style),
                );
            }
        }
        Shape::Ellipse(ellipse) => {
            if style.has_fill() {
                fill_ellipse(
                    buffer,
                    ellipse.center,
                    ellipse.width,
                    ellipse.height,
                    ellipse.rotation,
                    &layer(style.fill, style),
                );
            }
            if style.has_stroke() {
                stroke_ellipse(
                    buffer,
                    ellipse.center,
                    ellipse.width,
                    ellipse.height,
                    ellipse.rotation,
                    style.width,
                    &layer(style.stroke, style),
                );
            }
        }
        Shape::Sector(sector) => {
            if style.has_fill() {
                fill_sector(buffer, sector, &layer(style.fill, style));
            }
            if style.has_stroke() {
                stroke_sector(
                    buffer,
                    sector,
                    style.width,
                    style.draw_arc,
                    style.draw_radial_edges,
                    &layer(style.stroke, style),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Points, Ray};

    // Canvas draws read the global anti-aliasing flag, which defaults to on.
    // Tests here only check pixels that are solid or empty either way.

    #[test]
    fn test_line_ignores_fill() {
        let mut canvas = Canvas::new(20, 20, Color::WHITE);
        canvas.line(2.0, 10.0, 18.0, 10.0, &Style::filled(Color::RED));
        assert!(canvas.buffer().pixels().iter().all(|&c| c == Color::WHITE));
        canvas.line(2.0, 10.0, 18.0, 10.0, &Style::stroked(Color::RED, 3.0));
        assert_eq!(canvas.get(10, 10), Some(Color::RED));
    }

    #[test]
    fn test_collapsed_rect_paints_nothing() {
        let mut canvas = Canvas::new(20, 20, Color::WHITE);
        let style = Style::filled(Color::RED).stroke(Color::BLACK).width(3.0);
        canvas.rect(10.0, 10.0, 0.0, 0.0, &style);
        canvas.rect(10.0, 10.0, 0.0, 10.0, &style);
        canvas.rect(10.0, 10.0, 10.0, 0.0, &style.radius(2.0));
        assert!(canvas.buffer().pixels().iter().all(|&c| c == Color::WHITE));
    }

    #[test]
    fn test_circle_matches_shape_draw() {
        let style = Style::filled(Color::RED).stroke(Color::BLUE).width(2.0);
        let mut direct = Canvas::new(30, 30, Color::WHITE);
        direct.circle(15.0, 15.0, 8.0, &style);
        let mut via_shape = Canvas::new(30, 30, Color::WHITE);
        via_shape.draw(&Circle::new(15.0, 15.0, 8.0).into(), &style);
        assert_eq!(direct.buffer(), via_shape.buffer());
    }

    #[test]
    fn test_points_fall_back_to_fill() {
        let points: Shape = Points::new(vec![Point::new(5.0, 5.0), Point::new(15.0, 5.0)]).into();
        let mut canvas = Canvas::new(20, 10, Color::WHITE);
        canvas.draw(&points, &Style::filled(Color::GREEN).width(3.0));
        assert_eq!(canvas.get(5, 5), Some(Color::GREEN));
        assert_eq!(canvas.get(15, 5), Some(Color::GREEN));
        canvas.draw(&points, &Style::filled(Color::GREEN).stroke(Color::BLUE).width(3.0));
        assert_eq!(canvas.get(5, 5), Some(Color::BLUE));
        assert_eq!(canvas.get(10, 5), Some(Color::WHITE));
    }

    #[test]
    fn test_round_rect_clears_corners() {
        let mut square = Canvas::new(40, 40, Color::WHITE);
        square.rect(5.0, 5.0, 30.0, 30.0, &Style::filled(Color::RED));
        assert_eq!(square.get(6, 6), Some(Color::RED));

        let mut rounded = Canvas::new(40, 40, Color::WHITE);
        rounded.round_rect(5.0, 5.0, 30.0, 30.0, 10.0, &Style::filled(Color::RED));
        assert_eq!(rounded.get(6, 6), Some(Color::WHITE));
        assert_eq!(rounded.get(20, 20), Some(Color::RED));
        assert_eq!(rounded.get(20, 6), Some(Color::RED));
    }

    #[test]
    fn test_fill_then_stroke() {
        let mut canvas = Canvas::new(60, 60, Color::WHITE);
        let style = Style::filled(Color::RED).stroke(Color::BLUE).width(4.0);
        canvas.circle(30.0, 30.0, 20.0, &style);
        assert_eq!(canvas.get(30, 30), Some(Color::RED));
        assert_eq!(canvas.get(50, 30), Some(Color::BLUE));
    }

    #[test]
    fn test_batch_styled_fallbacks() {
        let shapes: Vec<Shape> = (0..3)
            .map(|i| Rect::from_xywh(i as f32 * 10.0, 0.0, 8.0, 8.0).into())
            .collect();
        let mut canvas = Canvas::new(30, 10, Color::WHITE);
        canvas.draw_batch_styled(&shapes, &[Style::filled(Color::RED), Style::filled(Color::BLUE)]);
        assert_eq!(canvas.get(4, 4), Some(Color::RED));
        assert_eq!(canvas.get(14, 4), Some(Color::BLUE));
        assert_eq!(canvas.get(24, 4), Some(Color::BLUE));

        // Default style paints nothing
        let mut blank = Canvas::new(30, 10, Color::WHITE);
        blank.draw_batch_styled(&shapes, &[]);
        assert!(blank.buffer().pixels().iter().all(|&c| c == Color::WHITE));
    }

    #[test]
    fn test_ray_uses_stroke() {
        let ray: Shape = Ray::new(Point::new(2.0, 5.0), 15.0, 0.0).into();
        let mut canvas = Canvas::new(20, 10, Color::BLACK);
        canvas.draw(&ray, &Style::stroked(Color::WHITE, 2.0));
        assert_ne!(canvas.get(10, 5), Some(Color::BLACK));
        assert_eq!(canvas.get(10, 1), Some(Color::BLACK));
    }

    #[test]
    fn test_zero_opacity_style_is_noop() {
        let mut canvas = Canvas::new(20, 20, Color::WHITE);
        canvas.circle(10.0, 10.0, 8.0, &Style::filled(Color::RED).opacity(0.0));
        assert!(canvas.buffer().pixels().iter().all(|&c| c == Color::WHITE));
    }

    #[test]
    fn test_copies_and_composites() {
        let mut canvas = Canvas::new(8, 4, Color::RED);
        let rotated = canvas.create_rotated(90.0);
        assert_eq!((rotated.width(), rotated.height()), (4, 8));
        let scaled = canvas.create_scaled(2.0, 2.0);
        assert_eq!((scaled.width(), scaled.height()), (16, 8));
        let cropped = canvas.create_cropped(6, 2, 10, 10);
        assert_eq!((cropped.width(), cropped.height()), (2, 2));

        let overlay = Canvas::new(2, 2, Color::BLUE);
        canvas.draw_canvas(&overlay, 1, 1, 255).crop(0, 0, 4, 4);
        assert_eq!((canvas.width(), canvas.height()), (4, 4));
        assert_eq!(canvas.get(1, 1), Some(Color::BLUE));
        assert_eq!(canvas.get(0, 0), Some(Color::RED));
    }
}
