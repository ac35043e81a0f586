//! softraster: anti-aliased 2D drawing into CPU pixel buffers
//!
//! Shapes are described by value ([`shapes`]), painted with a [`Style`]
//! through the [`Canvas`] facade, and land in a row-major ARGB
//! [`PixelBuffer`]. Buffers can be blended into each other ([`blend`]) and
//! scaled, rotated or cropped ([`transform`]). Text and image decoding are
//! collaborator traits ([`TextRenderer`], [`ImageDecoder`]).
//!
//! ```no_run
//! use softraster::{Canvas, Color, Style};
//!
//! let mut canvas = Canvas::new(100, 100, Color::WHITE);
//! canvas.circle(50.0, 50.0, 20.0, &Style::filled(Color::RED));
//! let bytes = canvas.buffer().to_argb_bytes();
//! # let _ = bytes;
//! ```

pub mod blend;
pub mod canvas;
pub mod color;
pub mod config;
pub mod display;
pub mod error;
pub mod geometry;
pub mod image;
pub mod raster;
pub mod scene;
pub mod shapes;
pub mod style;
pub mod text;
pub mod transform;

pub use blend::{blend_pixel, BlendMode};
pub use canvas::Canvas;
pub use color::Color;
pub use display::PixelBuffer;
pub use error::{RasterError, Result};
pub use geometry::{BoundingBox, Geometry, PixelRect, Point};
pub use image::{load_image, ImageDecoder, RawArgbDecoder};
pub use raster::Paint;
pub use scene::{Scene, SceneItem};
pub use shapes::{Circle, Ellipse, Line, Path, Points, Polygon, Ray, Rect, Sector, Shape, Triangle};
pub use style::{Style, StyleBuilder};
pub use text::{FontFlags, FontStyle, TextRenderer, TextRequest};
