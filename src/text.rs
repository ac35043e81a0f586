//! Text drawing through a pluggable glyph renderer
//!
//! Shaping and glyph rasterization live behind [`TextRenderer`]. This module
//! owns the layout rules around it: centering, clipping to a rect and
//! picking a font size that fits.

use std::ops::BitOr;

use bitflags::bitflags;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::blend::alpha_blend;
use crate::color::Color;
use crate::config::{self, TextEncoding};
use crate::display::PixelBuffer;
use crate::geometry::{BoundingBox, Point};

pub const DEFAULT_FONT: &str = "sans-serif";
pub const DEFAULT_FONT_SIZE: u32 = 16;
/// Upper bound for [`calculate_font_size`]
pub const MAX_FONT_SIZE: u32 = 1024;

bitflags! {
    /// Font decoration flags, combinable with `|`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct FontFlags: u8 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const UNDERLINE = 1 << 2;
        const STRIKEOUT = 1 << 3;
    }
}

/// Flags plus the two angles a renderer may honor (degrees)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FontStyle {
    pub flags: FontFlags,
    pub italic_angle: f32,
    pub rotation: f32,
}

impl FontStyle {
    pub const REGULAR: FontStyle = FontStyle {
        flags: FontFlags::empty(),
        italic_angle: 0.0,
        rotation: 0.0,
    };

    pub const fn from_flags(flags: FontFlags) -> Self {
        Self {
            flags,
            italic_angle: 0.0,
            rotation: 0.0,
        }
    }

    pub fn italic_angle(mut self, angle: f32) -> Self {
        self.italic_angle = angle;
        self
    }

    pub fn rotation(mut self, angle: f32) -> Self {
        self.rotation = angle;
        self
    }

    pub fn contains(&self, flags: FontFlags) -> bool {
        self.flags.contains(flags)
    }
}

impl From<FontFlags> for FontStyle {
    fn from(flags: FontFlags) -> Self {
        Self::from_flags(flags)
    }
}

impl BitOr<FontFlags> for FontStyle {
    type Output = FontStyle;
    fn bitor(mut self, rhs: FontFlags) -> FontStyle {
        self.flags |= rhs;
        self
    }
}

/// Everything a renderer needs to measure or draw one run of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest<'a> {
    pub text: &'a str,
    pub font_name: &'a str,
    pub size: u32,
    pub style: FontStyle,
    pub color: Color,
    pub anti_alias: bool,
    pub encoding: TextEncoding,
}

impl<'a> TextRequest<'a> {
    /// Regular white text in the default font; anti-aliasing and encoding
    /// come from `config`
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            font_name: DEFAULT_FONT,
            size: DEFAULT_FONT_SIZE,
            style: FontStyle::REGULAR,
            color: Color::WHITE,
            anti_alias: config::text_anti_aliasing(),
            encoding: config::text_encoding(),
        }
    }

    pub fn font(mut self, font_name: &'a str) -> Self {
        self.font_name = font_name;
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn style(mut self, style: impl Into<FontStyle>) -> Self {
        self.style = style.into();
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn anti_alias(mut self, enabled: bool) -> Self {
        self.anti_alias = enabled;
        self
    }
}

/// Glyph backend.
///
/// `render` draws the text with its top-left at `origin`, blending glyph
/// coverage into `target` (typically through [`crate::blend::blend_pixel`]).
pub trait TextRenderer {
    /// Pixel size of the rendered text, `None` if the font is unavailable
    fn measure(&self, request: &TextRequest<'_>) -> Option<(u32, u32)>;

    /// Draw the text; false on failure
    fn render(&self, target: &mut PixelBuffer, request: &TextRequest<'_>, origin: Point) -> bool;
}

/// Measured size; empty text is `(0, 0)`
pub fn measure_text(renderer: &dyn TextRenderer, request: &TextRequest<'_>) -> Option<(u32, u32)> {
    if request.text.is_empty() {
        return Some((0, 0));
    }
    renderer.measure(request)
}

/// Draw with the top-left at `(x, y)`
pub fn draw_text(
    buffer: &mut PixelBuffer,
    renderer: &dyn TextRenderer,
    request: &TextRequest<'_>,
    x: f32,
    y: f32,
) -> bool {
    if request.text.is_empty() {
        return true;
    }
    let ok = renderer.render(buffer, request, Point::new(x, y));
    if !ok {
        warn!("text renderer failed for font {:?}", request.font_name);
    }
    ok
}

/// Draw centered on `(cx, cy)`
pub fn draw_text_centered(
    buffer: &mut PixelBuffer,
    renderer: &dyn TextRenderer,
    request: &TextRequest<'_>,
    cx: f32,
    cy: f32,
) -> bool {
    if request.text.is_empty() {
        return true;
    }
    let Some((w, h)) = renderer.measure(request) else {
        warn!("text measure failed for font {:?}", request.font_name);
        return false;
    };
    draw_text(
        buffer,
        renderer,
        request,
        cx - w as f32 / 2.0,
        cy - h as f32 / 2.0,
    )
}

/// Draw into a scratch buffer the size of `rect`, then composite it, so
/// nothing lands outside the rect
fn draw_clipped(
    buffer: &mut PixelBuffer,
    renderer: &dyn TextRenderer,
    request: &TextRequest<'_>,
    rect: BoundingBox,
    origin: Point,
) -> bool {
    let (w, h) = (rect.width.round(), rect.height.round());
    if !(w >= 1.0 && h >= 1.0) {
        return false;
    }
    let mut scratch = PixelBuffer::with_size(w as u32, h as u32);
    if !renderer.render(&mut scratch, request, origin) {
        warn!("text renderer failed for font {:?}", request.font_name);
        return false;
    }
    alpha_blend(
        &scratch,
        buffer,
        rect.x.round() as i32,
        rect.y.round() as i32,
        255,
    );
    true
}

/// Draw from the rect's top-left, clipped to the rect
pub fn draw_text_in_rect(
    buffer: &mut PixelBuffer,
    renderer: &dyn TextRenderer,
    request: &TextRequest<'_>,
    rect: BoundingBox,
) -> bool {
    if request.text.is_empty() {
        return true;
    }
    draw_clipped(buffer, renderer, request, rect, Point::ORIGIN)
}

/// Pick the largest size that fits (see [`calculate_font_size`]) and draw
/// centered in the rect. Returns the size used, `None` if nothing fits.
pub fn draw_text_fit_rect(
    buffer: &mut PixelBuffer,
    renderer: &dyn TextRenderer,
    request: &TextRequest<'_>,
    rect: BoundingBox,
) -> Option<u32> {
    if request.text.is_empty() {
        return Some(request.size);
    }
    let size = calculate_font_size(renderer, request, rect.width, rect.height)?;
    let sized = request.clone().size(size);
    let (w, h) = renderer.measure(&sized)?;
    let origin = Point::new(
        ((rect.width - w as f32) / 2.0).round(),
        ((rect.height - h as f32) / 2.0).round(),
    );
    draw_clipped(buffer, renderer, &sized, rect, origin).then_some(size)
}

/// Largest font size whose measured text fits `max_width x max_height`.
///
/// Starts at `request.size`: searches upward (bounded by the height and
/// [`MAX_FONT_SIZE`]) when that fits, downward to 1 otherwise. `None` when
/// even size 1 doesn't fit or measuring fails. Empty text keeps the
/// preferred size.
pub fn calculate_font_size(
    renderer: &dyn TextRenderer,
    request: &TextRequest<'_>,
    max_width: f32,
    max_height: f32,
) -> Option<u32> {
    let preferred = request.size.clamp(1, MAX_FONT_SIZE);
    if request.text.is_empty() {
        return Some(preferred);
    }
    if !(max_width > 0.0 && max_height > 0.0) {
        return None;
    }
    let fits = |size: u32| {
        renderer
            .measure(&request.clone().size(size))
            .is_some_and(|(w, h)| w as f32 <= max_width && h as f32 <= max_height)
    };

    // Binary search for the last fitting size in [lo, hi); lo fits
    let search = |mut lo: u32, mut hi: u32| {
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if fits(mid) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    };

    if fits(preferred) {
        let upper = (max_height.ceil() as u32).clamp(preferred, MAX_FONT_SIZE);
        Some(search(preferred, upper + 1))
    } else if fits(1) {
        Some(search(1, preferred))
    } else {
        None
    }
}
