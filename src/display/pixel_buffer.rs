use crate::color::Color;
use crate::error::{RasterError, Result};
use crate::geometry::PixelRect;

// ============================================================================
// PixelBuffer
// ============================================================================

fn pixel_count(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(RasterError::TooLarge { width, height })
}

/// Row-major ARGB pixel buffer for software rendering.
///
/// Storage length always equals `width * height`. Any dimension change
/// allocates fresh storage. A default buffer is empty (0x0) and reports
/// `is_valid() == false`.
///
/// Pixel access policy: `at`/`at_mut` are bounds checked in every build
/// profile and return [`RasterError::OutOfRange`]. `get`/`set` are the
/// non-failing variants used by drawing code. Rasterizer inner loops work on
/// row slices that were clipped before the loop starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<Color>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Allocate `width * height` pixels initialized to `fill`
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        Self {
            pixels: vec![fill; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Transparent buffer of the given size
    pub fn with_size(width: u32, height: u32) -> Self {
        Self::new(width, height, Color::NONE)
    }

    /// Empty, invalid buffer
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap existing pixels. Fails if the length does not match.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(RasterError::DataLength {
                expected: expected.saturating_mul(4),
                actual: pixels.len().saturating_mul(4),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Build from the raw wire format: little-endian ARGB words, row-major,
    /// 4 bytes per pixel, no row padding.
    pub fn from_argb_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let expected = pixel_count(width, height)?
            .checked_mul(4)
            .ok_or(RasterError::TooLarge { width, height })?;
        if bytes.len() != expected {
            return Err(RasterError::DataLength {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| Color(u32::from_le_bytes([px[0], px[1], px[2], px[3]])))
            .collect();
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Serialize to the raw wire format (see [`PixelBuffer::from_argb_bytes`])
    pub fn to_argb_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for px in &self.pixels {
            bytes.extend_from_slice(&px.0.to_le_bytes());
        }
        bytes
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// True iff storage exists and both dimensions are positive
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.pixels.is_empty() && self.width > 0 && self.height > 0
    }

    /// The whole buffer as a rect at the origin
    pub fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width, self.height)
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate slice index for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn out_of_range(&self, x: i32, y: i32) -> RasterError {
        RasterError::OutOfRange {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    /// Bounds-checked pixel reference
    pub fn at(&self, x: i32, y: i32) -> Result<&Color> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_range(x, y));
        }
        let idx = self.pixel_index(x as u32, y as u32);
        Ok(&self.pixels[idx])
    }

    /// Bounds-checked mutable pixel reference
    pub fn at_mut(&mut self, x: i32, y: i32) -> Result<&mut Color> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_range(x, y));
        }
        let idx = self.pixel_index(x as u32, y as u32);
        Ok(&mut self.pixels[idx])
    }

    /// Read a pixel, `None` when out of bounds
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        if self.in_bounds(x, y) {
            Some(self.pixels[self.pixel_index(x as u32, y as u32)])
        } else {
            None
        }
    }

    /// Write a pixel; returns false (and does nothing) when out of bounds
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Color) -> bool {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            self.pixels[idx] = color;
            true
        } else {
            false
        }
    }

    /// One row of pixels. Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[Color] {
        let start = self.pixel_index(0, y);
        &self.pixels[start..start + self.width as usize]
    }

    /// One mutable row of pixels. Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [Color] {
        let start = self.pixel_index(0, y);
        let width = self.width as usize;
        &mut self.pixels[start..start + width]
    }

    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Overwrite every pixel
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Replace storage with a fresh `width * height` allocation filled with `fill`
    pub fn resize(&mut self, width: u32, height: u32, fill: Color) {
        *self = Self::new(width, height, fill);
    }

    /// Deep copy `src` into this buffer, reallocating if the size differs
    pub fn copy_from(&mut self, src: &PixelBuffer) {
        if self.width == src.width && self.height == src.height {
            self.pixels.copy_from_slice(&src.pixels);
        } else {
            self.clone_from(src);
        }
    }

    /// Write `color` to the clipped horizontal span `[x1, x2]` of row `y`
    pub fn hline(&mut self, x1: i32, x2: i32, y: i32, color: Color) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        if start > end {
            return;
        }
        self.row_mut(y as u32)[start as usize..=end as usize].fill(color);
    }

    // ========================================================================
    // Lossless quarter turns
    // ========================================================================

    /// Rotated copy by 90 degrees clockwise (Y-down). Dimensions swap.
    pub fn rotated_90(&self) -> Self {
        let mut rotated = Self::with_size(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                // (x, y) -> (height - 1 - y, x)
                let dst = rotated.pixel_index(self.height - 1 - y, x);
                rotated.pixels[dst] = self.pixels[self.pixel_index(x, y)];
            }
        }
        rotated
    }

    /// Rotated copy by 180 degrees. Dimensions stay the same.
    pub fn rotated_180(&self) -> Self {
        let mut rotated = self.clone();
        rotated.pixels.reverse();
        rotated
    }

    /// Rotated copy by 270 degrees clockwise. Dimensions swap.
    pub fn rotated_270(&self) -> Self {
        let mut rotated = Self::with_size(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                // (x, y) -> (y, width - 1 - x)
                let dst = rotated.pixel_index(y, self.width - 1 - x);
                rotated.pixels[dst] = self.pixels[self.pixel_index(x, y)];
            }
        }
        rotated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_invalid() {
        let buffer = PixelBuffer::default();
        assert!(!buffer.is_valid());
        assert_eq!(buffer.len(), 0);
        assert!(buffer.get(0, 0).is_none());
        assert!(!PixelBuffer::new(0, 10, Color::WHITE).is_valid());
    }

    #[test]
    fn test_storage_matches_dimensions() {
        let mut buffer = PixelBuffer::new(7, 3, Color::RED);
        assert_eq!(buffer.len(), 21);
        buffer.resize(4, 5, Color::BLUE);
        assert_eq!(buffer.len(), 20);
        assert!(buffer.pixels().iter().all(|&c| c == Color::BLUE));
    }

    #[test]
    fn test_clear_idempotent() {
        for &(w, h) in &[(1, 1), (3, 17), (640, 480), (4096, 4096)] {
            let mut buffer = PixelBuffer::new(w, h, Color::BLACK);
            buffer.clear(Color::CYAN);
            buffer.clear(Color::CYAN);
            assert!(buffer.pixels().iter().all(|&c| c == Color::CYAN));
        }
    }

    #[test]
    fn test_at_bounds_checked() {
        let mut buffer = PixelBuffer::new(4, 4, Color::WHITE);
        *buffer.at_mut(3, 2).unwrap() = Color::RED;
        assert_eq!(*buffer.at(3, 2).unwrap(), Color::RED);
        assert!(matches!(
            buffer.at(4, 0),
            Err(RasterError::OutOfRange { x: 4, y: 0, .. })
        ));
        assert!(buffer.at_mut(-1, 0).is_err());
        assert!(!buffer.set(0, 9, Color::RED));
    }

    #[test]
    fn test_take_leaves_source_empty() {
        let mut source = PixelBuffer::new(2, 2, Color::GREEN);
        let moved = std::mem::take(&mut source);
        assert!(moved.is_valid());
        assert!(!source.is_valid());
    }

    #[test]
    fn test_clone_is_deep() {
        let original = PixelBuffer::new(2, 2, Color::GREEN);
        let mut copy = original.clone();
        copy.set(0, 0, Color::RED);
        assert_eq!(original.get(0, 0), Some(Color::GREEN));
    }

    #[test]
    fn test_argb_bytes_layout() {
        let buffer = PixelBuffer::new(1, 1, Color(0x11223344));
        assert_eq!(buffer.to_argb_bytes(), vec![0x44, 0x33, 0x22, 0x11]);
        let parsed = PixelBuffer::from_argb_bytes(1, 1, &[0x44, 0x33, 0x22, 0x11]).unwrap();
        assert_eq!(parsed, buffer);
        assert!(matches!(
            PixelBuffer::from_argb_bytes(2, 2, &[0; 15]),
            Err(RasterError::DataLength {
                expected: 16,
                actual: 15
            })
        ));
    }

    #[test]
    fn test_argb_bytes_huge_dimensions_fail() {
        let result = PixelBuffer::from_argb_bytes(u32::MAX, u32::MAX, &[0; 16]);
        assert!(result.is_err());
        assert!(PixelBuffer::from_pixels(u32::MAX, u32::MAX, vec![Color::NONE; 4]).is_err());
    }

    #[test]
    fn test_hline_clips() {
        let mut buffer = PixelBuffer::new(5, 2, Color::BLACK);
        buffer.hline(3, -4, 1, Color::RED);
        assert_eq!(buffer.row(1)[..4], [Color::RED; 4]);
        assert_eq!(buffer.row(1)[4], Color::BLACK);
        buffer.hline(0, 4, 7, Color::RED);
        assert_eq!(buffer.row(0), &[Color::BLACK; 5]);
    }

    #[test]
    fn test_quarter_turns() {
        let mut buffer = PixelBuffer::new(3, 2, Color::BLACK);
        buffer.set(0, 0, Color::RED);
        let r90 = buffer.rotated_90();
        assert_eq!((r90.width(), r90.height()), (2, 3));
        assert_eq!(r90.get(1, 0), Some(Color::RED));
        assert_eq!(buffer.rotated_180().get(2, 1), Some(Color::RED));
        assert_eq!(buffer.rotated_270().get(0, 2), Some(Color::RED));
    }
}
