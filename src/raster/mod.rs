//! Scan conversion
//!
//! Every rasterizer accumulates per-pixel coverage into a [`CoverageMask`]
//! clipped to the target buffer, then hands it to [`composite_mask`]. Pixel
//! `(i, j)` is the unit square centered on integer coordinate `(i, j)`.
//!
//! Degenerate input (non-finite coordinates, zero size or radius, empty
//! vertex lists) draws nothing.

mod ellipse;
mod line;
mod polygon;
mod rect;
mod sector;

pub use ellipse::{fill_circle, fill_ellipse, stroke_circle, stroke_ellipse};
pub use line::{draw_dots, draw_line, stroke_polyline};
pub use polygon::fill_polygon;
pub use rect::{round_rect_vertices, MAX_CORNER_SEGMENTS};
pub use sector::{fill_sector, stroke_sector};

use crate::blend::{blend_pixel, BlendMode};
use crate::color::Color;
use crate::config;
use crate::display::PixelBuffer;
use crate::geometry::{BoundingBox, Point};

// ============================================================================
// Paint
// ============================================================================

/// Color, opacity and blend mode for one rasterized layer (fill or stroke)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Color,
    /// 0..=255, multiplies the color's alpha
    pub opacity: u8,
    pub mode: BlendMode,
    /// Fractional coverage; when off coverage is thresholded at 0.5
    pub anti_alias: bool,
}

impl Paint {
    /// Opaque alpha-blended paint, anti-aliasing taken from `config`
    pub fn new(color: Color) -> Self {
        Self {
            color,
            opacity: 255,
            mode: BlendMode::Alpha,
            anti_alias: config::anti_aliasing(),
        }
    }

    pub fn opacity(mut self, opacity: u8) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn mode(mut self, mode: BlendMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn anti_alias(mut self, enabled: bool) -> Self {
        self.anti_alias = enabled;
        self
    }

    /// Nothing would change in the target
    pub fn is_invisible(&self) -> bool {
        self.mode != BlendMode::Copy && (self.opacity == 0 || self.color.a() == 0)
    }
}

// ============================================================================
// Coverage helpers
// ============================================================================

/// Box-filtered coverage of a pixel whose center is `sd` inside an edge
#[inline]
pub(crate) fn edge_coverage(sd: f32) -> f32 {
    (0.5 + sd).clamp(0.0, 1.0)
}

/// Overlap of the unit interval centered on `t` with `[-half, half]`
#[inline]
pub(crate) fn band_coverage(t: f32, half: f32) -> f32 {
    ((t + 0.5).min(half) - (t - 0.5).max(-half)).clamp(0.0, 1.0)
}

/// Overlap of the unit interval centered on `t` with `[0, len]`
#[inline]
pub(crate) fn interval_coverage(t: f32, len: f32) -> f32 {
    ((t + 0.5).min(len) - (t - 0.5).max(0.0)).clamp(0.0, 1.0)
}

/// Finite and strictly positive (rejects NaN)
#[inline]
pub(crate) fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

pub(crate) fn all_finite(points: &[Point]) -> bool {
    points.iter().all(|p| p.is_finite())
}

// ============================================================================
// CoverageMask
// ============================================================================

/// Per-pixel coverage in `[0, 1]` over a rectangle of the target buffer
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageMask {
    x: i32,
    y: i32,
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl CoverageMask {
    /// Mask covering `region` clipped to a `target_width x target_height`
    /// buffer. `None` when the clipped region is empty or not finite.
    pub fn new(target_width: u32, target_height: u32, region: BoundingBox) -> Option<Self> {
        if !(region.x.is_finite()
            && region.y.is_finite()
            && region.width.is_finite()
            && region.height.is_finite())
        {
            return None;
        }
        let x0 = region.left().floor().max(0.0);
        let y0 = region.top().floor().max(0.0);
        let x1 = region.right().ceil().min(target_width as f32 - 1.0);
        let y1 = region.bottom().ceil().min(target_height as f32 - 1.0);
        if x1 < x0 || y1 < y0 {
            return None;
        }
        let width = (x1 - x0) as usize + 1;
        let height = (y1 - y0) as usize + 1;
        Some(Self {
            x: x0 as i32,
            y: y0 as i32,
            width,
            height,
            data: vec![0.0; width * height],
        })
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    /// Inclusive
    pub fn right(&self) -> i32 {
        self.x + self.width as i32 - 1
    }

    /// Inclusive
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32 - 1
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < self.x || y < self.y || x > self.right() || y > self.bottom() {
            return None;
        }
        Some((y - self.y) as usize * self.width + (x - self.x) as usize)
    }

    /// Coverage at a target pixel, 0 outside the mask
    pub fn get(&self, x: i32, y: i32) -> f32 {
        self.index(x, y).map_or(0.0, |i| self.data[i])
    }

    /// Add coverage (scanline accumulation)
    #[inline]
    pub fn add(&mut self, x: i32, y: i32, coverage: f32) {
        if let Some(i) = self.index(x, y) {
            self.data[i] += coverage;
        }
    }

    /// Keep the larger coverage (overlapping stroke pieces)
    #[inline]
    pub fn raise(&mut self, x: i32, y: i32, coverage: f32) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = self.data[i].max(coverage);
        }
    }

    /// Rows of the mask that intersect `[top, bottom]`
    pub fn rows(&self, top: f32, bottom: f32) -> std::ops::RangeInclusive<i32> {
        let lo = (top.floor() as i32).max(self.top());
        let hi = (bottom.ceil() as i32).min(self.bottom());
        lo..=hi
    }

    /// Columns of the mask that intersect `[left, right]`
    pub fn columns(&self, left: f32, right: f32) -> std::ops::RangeInclusive<i32> {
        let lo = (left.floor() as i32).max(self.left());
        let hi = (right.ceil() as i32).min(self.right());
        lo..=hi
    }

    /// Clamp to `[0, 1]`, then snap to 0/1 when anti-aliasing is off
    pub fn finish(&mut self, anti_alias: bool) {
        for c in &mut self.data {
            *c = c.clamp(0.0, 1.0);
            if !anti_alias {
                *c = if *c >= 0.5 { 1.0 } else { 0.0 };
            }
        }
    }

    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&c| c <= 0.0)
    }
}

/// Blend `paint` into `buffer` weighted by the mask's coverage
pub fn composite_mask(buffer: &mut PixelBuffer, mask: &CoverageMask, paint: &Paint) {
    if paint.is_invisible() {
        return;
    }
    for y in mask.top()..=mask.bottom() {
        let row_start = (y - mask.top()) as usize * mask.width;
        let coverage = &mask.data[row_start..row_start + mask.width];
        let x0 = mask.left() as usize;
        let pixels = &mut buffer.row_mut(y as u32)[x0..x0 + mask.width];
        for (px, &c) in pixels.iter_mut().zip(coverage) {
            if c <= 0.0 {
                continue;
            }
            let opacity = (paint.opacity as f32 * c).round() as u8;
            *px = blend_pixel(paint.mode, paint.color, *px, opacity);
        }
    }
}

/// Finish and composite in one step
pub(crate) fn paint_mask(buffer: &mut PixelBuffer, mut mask: CoverageMask, paint: &Paint) {
    mask.finish(paint.anti_alias);
    composite_mask(buffer, &mask, paint);
}
