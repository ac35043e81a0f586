//! Compositor: per-pixel blend math and buffer-to-buffer blends
//!
//! Colors are straight (non-premultiplied) ARGB. Every mode first scales
//! the source alpha by the call's opacity, `Sa' = Sa * O / 255`.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::display::PixelBuffer;
use crate::geometry::PixelRect;

/// How source pixels combine with destination pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Replace the destination; alpha becomes `Sa'`
    Copy,
    /// Standard "over"
    #[default]
    Alpha,
    /// Saturating add of the weighted source
    Add,
    Multiply,
    Screen,
    Overlay,
    /// Like alpha, but the result is never more opaque than `Sa'`
    DestAlpha,
}

/// `x / 255` rounded to nearest, exact for `x <= 65535`
#[inline]
fn div255(x: u32) -> u32 {
    let x = x + 128;
    (x + (x >> 8)) >> 8
}

/// Blend a single channel: `src * alpha + dst * (1 - alpha)`
#[inline]
fn lerp_channel(src: u32, dst: u32, alpha: u32) -> u8 {
    div255(src * alpha + dst * (255 - alpha)) as u8
}

#[inline]
fn channels(c: Color) -> [u32; 3] {
    [c.r() as u32, c.g() as u32, c.b() as u32]
}

/// Composite one pixel. `opacity` is 0..=255 and scales the source alpha.
///
/// With `Sa' == 0` every mode except `Copy` returns `dst` unchanged.
#[inline]
pub fn blend_pixel(mode: BlendMode, src: Color, dst: Color, opacity: u8) -> Color {
    let sa = div255(src.a() as u32 * opacity as u32);

    if mode == BlendMode::Copy {
        return src.with_alpha(sa as u8);
    }
    if sa == 0 {
        return dst;
    }

    let da = dst.a() as u32;
    let out_a = match mode {
        BlendMode::DestAlpha => sa,
        _ => sa + div255(da * (255 - sa)),
    };

    let s = channels(src);
    let d = channels(dst);
    if mode == BlendMode::Alpha && da < 255 {
        return over_translucent(s, d, sa, da, out_a);
    }
    let mut out = [0u8; 3];
    for i in 0..3 {
        let (sc, dc) = (s[i], d[i]);
        out[i] = match mode {
            BlendMode::Alpha | BlendMode::DestAlpha | BlendMode::Copy => lerp_channel(sc, dc, sa),
            BlendMode::Add => (div255(sc * sa) + dc).min(255) as u8,
            BlendMode::Multiply => lerp_channel(div255(sc * dc), dc, sa),
            BlendMode::Screen => {
                let screened = 255 - div255((255 - sc) * (255 - dc));
                lerp_channel(screened, dc, sa)
            },
            BlendMode::Overlay => {
                let overlaid = if dc < 128 {
                    div255(2 * sc * dc)
                } else {
                    255 - div255(2 * (255 - sc) * (255 - dc))
                };
                lerp_channel(overlaid, dc, sa)
            },
        };
    }

    Color::argb(out_a as u8, out[0], out[1], out[2])
}

/// Straight-alpha "over" onto a destination that isn't opaque: colors are
/// weighted by their alphas and renormalized by the result alpha. Matches
/// the plain lerp when `da == 255`.
fn over_translucent(s: [u32; 3], d: [u32; 3], sa: u32, da: u32, out_a: u32) -> Color {
    let dst_weight = da * (255 - sa);
    let denom = out_a * 255;
    let mut out = [0u8; 3];
    for i in 0..3 {
        let num = s[i] * sa * 255 + d[i] * dst_weight;
        out[i] = ((num + denom / 2) / denom).min(255) as u8;
    }
    Color::argb(out_a as u8, out[0], out[1], out[2])
}

// ============================================================================
// Buffer operations
// ============================================================================

/// Blend the `region` of `src` into `dst` with its top-left at `(x, y)`.
///
/// The region is clipped to `src`, then the placed region is clipped to
/// `dst`; only the overlap is touched. Opacity 0 is a no-op except for
/// `Copy`.
pub fn blend_region(
    src: &PixelBuffer,
    region: PixelRect,
    dst: &mut PixelBuffer,
    x: i32,
    y: i32,
    opacity: u8,
    mode: BlendMode,
) {
    if opacity == 0 && mode != BlendMode::Copy {
        return;
    }
    let Some(src_rect) = region.intersect(&src.bounds()) else {
        return;
    };
    // Where the clipped source lands in the destination
    let place_x = x as i64 + (src_rect.x as i64 - region.x as i64);
    let place_y = y as i64 + (src_rect.y as i64 - region.y as i64);
    let left = place_x.max(0);
    let top = place_y.max(0);
    let right = (place_x + src_rect.width as i64).min(dst.width() as i64);
    let bottom = (place_y + src_rect.height as i64).min(dst.height() as i64);
    if right <= left || bottom <= top {
        return;
    }

    let span = (right - left) as usize;
    let src_x = (src_rect.x as i64 + (left - place_x)) as usize;
    let dst_x = left as usize;

    for dy in top..bottom {
        let sy = src_rect.y as i64 + (dy - place_y);
        let src_row = &src.row(sy as u32)[src_x..src_x + span];
        let dst_row = &mut dst.row_mut(dy as u32)[dst_x..dst_x + span];
        for (d, &s) in dst_row.iter_mut().zip(src_row) {
            *d = blend_pixel(mode, s, *d, opacity);
        }
    }
}

/// Blend all of `src` into `dst` with its top-left at `(x, y)`
pub fn blend(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    x: i32,
    y: i32,
    opacity: u8,
    mode: BlendMode,
) {
    blend_region(src, src.bounds(), dst, x, y, opacity, mode);
}

pub fn copy_blend(src: &PixelBuffer, dst: &mut PixelBuffer, x: i32, y: i32, opacity: u8) {
    blend(src, dst, x, y, opacity, BlendMode::Copy);
}

pub fn alpha_blend(src: &PixelBuffer, dst: &mut PixelBuffer, x: i32, y: i32, opacity: u8) {
    blend(src, dst, x, y, opacity, BlendMode::Alpha);
}

pub fn add_blend(src: &PixelBuffer, dst: &mut PixelBuffer, x: i32, y: i32, opacity: u8) {
    blend(src, dst, x, y, opacity, BlendMode::Add);
}

pub fn multiply_blend(src: &PixelBuffer, dst: &mut PixelBuffer, x: i32, y: i32, opacity: u8) {
    blend(src, dst, x, y, opacity, BlendMode::Multiply);
}

pub fn screen_blend(src: &PixelBuffer, dst: &mut PixelBuffer, x: i32, y: i32, opacity: u8) {
    blend(src, dst, x, y, opacity, BlendMode::Screen);
}

pub fn overlay_blend(src: &PixelBuffer, dst: &mut PixelBuffer, x: i32, y: i32, opacity: u8) {
    blend(src, dst, x, y, opacity, BlendMode::Overlay);
}

pub fn dest_alpha_blend(src: &PixelBuffer, dst: &mut PixelBuffer, x: i32, y: i32, opacity: u8) {
    blend(src, dst, x, y, opacity, BlendMode::DestAlpha);
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_MODES: [BlendMode; 7] = [
        BlendMode::Copy,
        BlendMode::Alpha,
        BlendMode::Add,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::DestAlpha,
    ];

    #[test]
    fn test_div255_exact() {
        for a in 0..=255u32 {
            for b in [0u32, 1, 127, 128, 254, 255] {
                let expected = ((a * b) as f32 / 255.0).round() as u32;
                assert_eq!(div255(a * b), expected, "{a} * {b}");
            }
        }
    }

    #[test]
    fn test_alpha_opaque_replaces() {
        let src = Color::rgb(10, 200, 30);
        assert_eq!(blend_pixel(BlendMode::Alpha, src, Color::WHITE, 255), src);
        assert_eq!(
            blend_pixel(BlendMode::Alpha, src, Color::WHITE, 0),
            Color::WHITE
        );
    }

    #[test]
    fn test_zero_opacity_is_noop_except_copy() {
        let dst = Color::rgb(40, 50, 60);
        for mode in ALL_MODES {
            let out = blend_pixel(mode, Color::RED, dst, 0);
            if mode == BlendMode::Copy {
                assert_eq!(out, Color::RED.with_alpha(0));
            } else {
                assert_eq!(out, dst, "{mode:?}");
            }
        }
    }

    #[test]
    fn test_mode_formulas() {
        let dst = Color::rgb(100, 200, 50);
        let src = Color::rgb(200, 100, 0);
        assert_eq!(
            blend_pixel(BlendMode::Add, src, dst, 255),
            Color::rgb(255, 255, 50)
        );
        assert_eq!(
            blend_pixel(BlendMode::Multiply, Color::WHITE, dst, 255),
            dst
        );
        assert_eq!(
            blend_pixel(BlendMode::Screen, Color::BLACK, dst, 255),
            dst
        );
        // Overlay: dark dst multiplies, bright dst screens
        let out = blend_pixel(BlendMode::Overlay, Color::rgb(128, 128, 128), dst, 255);
        assert_eq!(out.r(), 100);
        assert_eq!(out.g(), 200);
    }

    #[test]
    fn test_half_alpha_mixes() {
        let out = blend_pixel(BlendMode::Alpha, Color::BLACK, Color::WHITE, 128);
        assert_eq!(out.a(), 255);
        assert!((126..=128).contains(&out.r()));
    }

    #[test]
    fn test_alpha_onto_transparent_keeps_color() {
        let out = blend_pixel(BlendMode::Alpha, Color::RED, Color::NONE, 128);
        assert_eq!(out, Color::RED.with_alpha(128));
        let out = blend_pixel(BlendMode::Alpha, Color::BLUE, Color::RED.with_alpha(128), 255);
        assert_eq!(out, Color::BLUE);
    }

    #[test]
    fn test_dest_alpha_caps_alpha() {
        let out = blend_pixel(BlendMode::DestAlpha, Color::RED, Color::WHITE, 100);
        assert_eq!(out.a(), 100);
        let out = blend_pixel(BlendMode::Alpha, Color::RED, Color::WHITE, 100);
        assert_eq!(out.a(), 255);
    }

    #[test]
    fn test_opaque_src_covering_dst() {
        let src = PixelBuffer::new(8, 8, Color::rgb(1, 2, 3));
        let mut dst = PixelBuffer::new(8, 8, Color::WHITE);
        alpha_blend(&src, &mut dst, 0, 0, 0);
        assert!(dst.pixels().iter().all(|&c| c == Color::WHITE));
        alpha_blend(&src, &mut dst, 0, 0, 255);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_partial_overlap_clips() {
        let src = PixelBuffer::new(4, 4, Color::RED);
        let mut dst = PixelBuffer::new(6, 6, Color::BLACK);
        alpha_blend(&src, &mut dst, -2, 4, 255);
        assert_eq!(dst.get(0, 4), Some(Color::RED));
        assert_eq!(dst.get(1, 5), Some(Color::RED));
        assert_eq!(dst.get(2, 4), Some(Color::BLACK));
        assert_eq!(dst.get(0, 3), Some(Color::BLACK));

        let mut untouched = PixelBuffer::new(6, 6, Color::BLACK);
        alpha_blend(&src, &mut untouched, 6, 0, 255);
        alpha_blend(&src, &mut untouched, -4, -4, 255);
        assert!(untouched.pixels().iter().all(|&c| c == Color::BLACK));
    }

    #[test]
    fn test_blend_region_offsets() {
        let mut src = PixelBuffer::new(4, 4, Color::BLACK);
        src.set(2, 3, Color::GREEN);
        let mut dst = PixelBuffer::new(4, 4, Color::WHITE);
        blend_region(
            &src,
            PixelRect::new(2, 2, 10, 10),
            &mut dst,
            1,
            1,
            255,
            BlendMode::Copy,
        );
        assert_eq!(dst.get(1, 2), Some(Color::GREEN));
        assert_eq!(dst.get(0, 0), Some(Color::WHITE));
        assert_eq!(dst.get(3, 3), Some(Color::WHITE));
    }

    #[test]
    fn test_blend_region_extreme_offsets() {
        let src = PixelBuffer::new(4, 4, Color::GREEN);
        let mut dst = PixelBuffer::new(4, 4, Color::WHITE);
        blend_region(
            &src,
            PixelRect::new(i32::MIN, i32::MIN, u32::MAX, u32::MAX),
            &mut dst,
            i32::MAX,
            0,
            255,
            BlendMode::Copy,
        );
        assert!(dst.pixels().iter().all(|&c| c == Color::WHITE));

        blend_region(
            &src,
            PixelRect::new(i32::MIN, i32::MIN, u32::MAX, u32::MAX),
            &mut dst,
            i32::MIN,
            i32::MIN,
            255,
            BlendMode::Copy,
        );
        assert!(dst.pixels().iter().all(|&c| c == Color::GREEN));
    }
}
