//! Whole-buffer transforms: crop, scale, rotate, and drawing the result
//!
//! Scale/rotate produce a new buffer sized to the transformed bounds. Each
//! destination pixel is mapped back into the source around the two buffers'
//! centers and sampled; samples that land outside the source are
//! transparent. Exact identities and quarter turns are lossless.

use log::{debug, warn};

use crate::blend::{blend, BlendMode};
use crate::color::Color;
use crate::config;
use crate::display::PixelBuffer;
use crate::geometry::{normalize_degrees, PixelRect};

/// Largest width or height a transform will allocate
pub const MAX_DIMENSION: u32 = 1 << 15;

/// How source pixels are read at fractional positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sampling {
    Nearest,
    Bilinear,
}

impl Sampling {
    /// Bilinear when anti-aliasing is enabled
    pub fn from_config() -> Self {
        if config::anti_aliasing() {
            Self::Bilinear
        } else {
            Self::Nearest
        }
    }
}

// ============================================================================
// Crop
// ============================================================================

/// Copy of the region `(x, y, width, height)` clipped to `src`; empty when
/// nothing overlaps
pub fn crop(src: &PixelBuffer, x: i32, y: i32, width: u32, height: u32) -> PixelBuffer {
    let Some(region) = PixelRect::new(x, y, width, height).intersect(&src.bounds()) else {
        return PixelBuffer::empty();
    };
    let mut out = PixelBuffer::with_size(region.width, region.height);
    let x0 = region.x as usize;
    let span = region.width as usize;
    for row in 0..region.height {
        let sy = region.y as u32 + row;
        out.row_mut(row)
            .copy_from_slice(&src.row(sy)[x0..x0 + span]);
    }
    out
}

// ============================================================================
// Sampling
// ============================================================================

fn sample_nearest(src: &PixelBuffer, x: f32, y: f32) -> Color {
    src.get(x.round() as i32, y.round() as i32)
        .unwrap_or(Color::NONE)
}

/// Bilinear filter over premultiplied channels, so transparent neighbours
/// don't darken edges
fn sample_bilinear(src: &PixelBuffer, x: f32, y: f32) -> Color {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (ix, iy) = (x0 as i32, y0 as i32);

    let taps = [
        (ix, iy, (1.0 - fx) * (1.0 - fy)),
        (ix + 1, iy, fx * (1.0 - fy)),
        (ix, iy + 1, (1.0 - fx) * fy),
        (ix + 1, iy + 1, fx * fy),
    ];

    let (mut a, mut r, mut g, mut b) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);
    for (tx, ty, w) in taps {
        if w <= 0.0 {
            continue;
        }
        let Some(c) = src.get(tx, ty) else {
            continue;
        };
        let wa = w * c.a() as f32;
        a += wa;
        r += wa * c.r() as f32;
        g += wa * c.g() as f32;
        b += wa * c.b() as f32;
    }

    if a <= 0.0 {
        return Color::NONE;
    }
    Color::argb(
        a.round().min(255.0) as u8,
        (r / a).round().min(255.0) as u8,
        (g / a).round().min(255.0) as u8,
        (b / a).round().min(255.0) as u8,
    )
}

// ============================================================================
// Scale / rotate
// ============================================================================

/// Output side length, tolerant of float noise from sin/cos
fn extent(v: f32) -> u32 {
    (v - 1e-3).ceil().max(0.0) as u32
}

/// Lossless path for unit scale and multiples of 90 degrees
fn exact_turn(src: &PixelBuffer, sx: f32, sy: f32, angle: f32) -> Option<PixelBuffer> {
    if sx != 1.0 || sy != 1.0 {
        return None;
    }
    let a = normalize_degrees(angle);
    if a == 0.0 {
        Some(src.clone())
    } else if a == 90.0 {
        Some(src.rotated_90())
    } else if a == 180.0 {
        Some(src.rotated_180())
    } else if a == 270.0 {
        Some(src.rotated_270())
    } else {
        None
    }
}

/// Scale by `(sx, sy)` then rotate by `angle` degrees, using `sampling`.
///
/// Negative scale factors mirror. Zero or non-finite parameters, or an
/// invalid source, give an empty buffer.
pub fn transform_with(
    src: &PixelBuffer,
    sx: f32,
    sy: f32,
    angle: f32,
    sampling: Sampling,
) -> PixelBuffer {
    if !src.is_valid()
        || !(sx.is_finite() && sy.is_finite() && angle.is_finite())
        || sx == 0.0
        || sy == 0.0
    {
        debug!("transform skipped: scale ({}, {}), angle {}", sx, sy, angle);
        return PixelBuffer::empty();
    }
    if let Some(out) = exact_turn(src, sx, sy, angle) {
        return out;
    }

    let (sin, cos) = angle.to_radians().sin_cos();
    let half_w = src.width() as f32 / 2.0 * sx.abs();
    let half_h = src.height() as f32 / 2.0 * sy.abs();
    let out_w = extent(2.0 * (half_w * cos.abs() + half_h * sin.abs()));
    let out_h = extent(2.0 * (half_w * sin.abs() + half_h * cos.abs()));
    if out_w == 0 || out_h == 0 {
        return PixelBuffer::empty();
    }
    if out_w > MAX_DIMENSION || out_h > MAX_DIMENSION {
        warn!("transform output {}x{} exceeds limit, skipped", out_w, out_h);
        return PixelBuffer::empty();
    }

    let src_cx = (src.width() as f32 - 1.0) / 2.0;
    let src_cy = (src.height() as f32 - 1.0) / 2.0;
    let dst_cx = (out_w as f32 - 1.0) / 2.0;
    let dst_cy = (out_h as f32 - 1.0) / 2.0;

    let mut out = PixelBuffer::with_size(out_w, out_h);
    for y in 0..out_h {
        let dy = y as f32 - dst_cy;
        let row = out.row_mut(y);
        for (x, px) in row.iter_mut().enumerate() {
            let dx = x as f32 - dst_cx;
            // Inverse rotation, then inverse scale
            let ux = dx * cos + dy * sin;
            let uy = -dx * sin + dy * cos;
            let src_x = ux / sx + src_cx;
            let src_y = uy / sy + src_cy;
            *px = match sampling {
                Sampling::Nearest => sample_nearest(src, src_x, src_y),
                Sampling::Bilinear => sample_bilinear(src, src_x, src_y),
            };
        }
    }
    out
}

pub fn scale(src: &PixelBuffer, sx: f32, sy: f32) -> PixelBuffer {
    transform_with(src, sx, sy, 0.0, Sampling::from_config())
}

pub fn scale_uniform(src: &PixelBuffer, factor: f32) -> PixelBuffer {
    scale(src, factor, factor)
}

pub fn rotate(src: &PixelBuffer, angle: f32) -> PixelBuffer {
    transform_with(src, 1.0, 1.0, angle, Sampling::from_config())
}

pub fn scale_rotate(src: &PixelBuffer, factor: f32, angle: f32) -> PixelBuffer {
    transform_with(src, factor, factor, angle, Sampling::from_config())
}

// ============================================================================
// Draw transformed
// ============================================================================

/// Alpha-composite `src`, scaled and rotated, centered on `(cx, cy)` in `dst`
pub fn draw_transformed(
    dst: &mut PixelBuffer,
    src: &PixelBuffer,
    cx: f32,
    cy: f32,
    sx: f32,
    sy: f32,
    angle: f32,
    opacity: u8,
) {
    if !(cx.is_finite() && cy.is_finite()) {
        return;
    }
    let transformed = transform_with(src, sx, sy, angle, Sampling::from_config());
    if !transformed.is_valid() {
        return;
    }
    let x = (cx - (transformed.width() as f32 - 1.0) / 2.0).round() as i32;
    let y = (cy - (transformed.height() as f32 - 1.0) / 2.0).round() as i32;
    blend(&transformed, dst, x, y, opacity, BlendMode::Alpha);
}

pub fn draw_scaled(
    dst: &mut PixelBuffer,
    src: &PixelBuffer,
    cx: f32,
    cy: f32,
    sx: f32,
    sy: f32,
    opacity: u8,
) {
    draw_transformed(dst, src, cx, cy, sx, sy, 0.0, opacity);
}

pub fn draw_rotated(
    dst: &mut PixelBuffer,
    src: &PixelBuffer,
    cx: f32,
    cy: f32,
    angle: f32,
    opacity: u8,
) {
    draw_transformed(dst, src, cx, cy, 1.0, 1.0, angle, opacity);
}

pub fn draw_scaled_rotated(
    dst: &mut PixelBuffer,
    src: &PixelBuffer,
    cx: f32,
    cy: f32,
    factor: f32,
    angle: f32,
    opacity: u8,
) {
    draw_transformed(dst, src, cx, cy, factor, factor, angle, opacity);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: u32, h: u32) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(w, h, Color::WHITE);
        for y in 0..h as i32 {
            for x in 0..w as i32 {
                if (x + y) % 2 == 0 {
                    buffer.set(x, y, Color::rgb(x as u8 * 10, y as u8 * 10, 77));
                }
            }
        }
        buffer
    }

    #[test]
    fn test_identity_is_pixel_exact() {
        let src = checker(7, 5);
        assert_eq!(transform_with(&src, 1.0, 1.0, 0.0, Sampling::Bilinear), src);
        assert_eq!(transform_with(&src, 1.0, 1.0, 360.0, Sampling::Nearest), src);
    }

    #[test]
    fn test_quarter_turn_is_lossless() {
        let src = checker(7, 5);
        let out = transform_with(&src, 1.0, 1.0, 90.0, Sampling::Bilinear);
        assert_eq!(out, src.rotated_90());
        let back = transform_with(&out, 1.0, 1.0, -90.0, Sampling::Bilinear);
        assert_eq!(back, src);
    }

    #[test]
    fn test_scale_output_size() {
        let src = checker(10, 4);
        let out = transform_with(&src, 2.0, 0.5, 0.0, Sampling::Nearest);
        assert_eq!((out.width(), out.height()), (20, 2));
        let mirrored = transform_with(&src, -1.0, 1.0, 0.0, Sampling::Nearest);
        assert_eq!(mirrored.get(0, 0), src.get(9, 0));
    }

    #[test]
    fn test_rotated_corners_transparent() {
        let src = PixelBuffer::new(20, 20, Color::RED);
        let out = transform_with(&src, 1.0, 1.0, 45.0, Sampling::Bilinear);
        assert!(out.width() > 20 && out.width() == out.height());
        assert_eq!(out.get(0, 0), Some(Color::NONE));
        let c = (out.width() / 2) as i32;
        assert_eq!(out.get(c, c), Some(Color::RED));
    }

    #[test]
    fn test_degenerate_transforms_empty() {
        let src = checker(4, 4);
        assert!(!transform_with(&src, 0.0, 1.0, 0.0, Sampling::Nearest).is_valid());
        assert!(!transform_with(&src, f32::NAN, 1.0, 0.0, Sampling::Nearest).is_valid());
        assert!(!transform_with(&PixelBuffer::empty(), 1.0, 1.0, 10.0, Sampling::Nearest).is_valid());
    }

    #[test]
    fn test_crop_clips() {
        let src = checker(8, 8);
        let out = crop(&src, 6, -2, 5, 5);
        assert_eq!((out.width(), out.height()), (2, 3));
        assert_eq!(out.get(0, 0), src.get(6, 0));
        assert!(!crop(&src, 8, 0, 2, 2).is_valid());
    }

    #[test]
    fn test_crop_oversized_region_keeps_whole_buffer() {
        let src = checker(8, 8);
        assert_eq!(crop(&src, 0, 0, u32::MAX, u32::MAX), src);
        assert_eq!(crop(&src, -4, -4, u32::MAX, u32::MAX), src);
    }

    #[test]
    fn test_draw_transformed_centers() {
        let src = PixelBuffer::new(3, 3, Color::BLUE);
        let mut dst = PixelBuffer::new(20, 20, Color::WHITE);
        draw_transformed(&mut dst, &src, 10.0, 10.0, 1.0, 1.0, 0.0, 255);
        assert_eq!(dst.get(9, 9), Some(Color::BLUE));
        assert_eq!(dst.get(11, 11), Some(Color::BLUE));
        assert_eq!(dst.get(12, 10), Some(Color::WHITE));
    }
}
